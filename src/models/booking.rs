use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "raum_id")]
    pub room_id: i64,
    #[serde(rename = "raum_name", default)]
    pub room_name: Option<String>,
    #[serde(rename = "start_datum", with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "end_datum", with = "timestamp")]
    pub end: NaiveDateTime,
    #[serde(rename = "benutzer_name")]
    pub requester_name: String,
    #[serde(rename = "benutzer_email")]
    pub requester_email: String,
    #[serde(rename = "zweck", default)]
    pub purpose: Option<String>,
    pub status: BookingStatus,
}

impl Booking {
    /// Only confirmed bookings open the detail view.
    pub fn is_selectable(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    #[serde(rename = "ausstehend")]
    Pending,
    #[serde(rename = "bestätigt")]
    Confirmed,
    #[serde(rename = "abgelehnt")]
    Rejected,
    #[serde(rename = "gelöscht")]
    Deleted,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "ausstehend",
            BookingStatus::Confirmed => "bestätigt",
            BookingStatus::Rejected => "abgelehnt",
            BookingStatus::Deleted => "gelöscht",
        }
    }
}

/// Body of `POST /api/buchung`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBooking {
    #[serde(rename = "raum_id")]
    pub room_id: i64,
    #[serde(rename = "start_datum", with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "end_datum", with = "timestamp")]
    pub end: NaiveDateTime,
    #[serde(rename = "benutzer_name")]
    pub requester_name: String,
    #[serde(rename = "benutzer_email")]
    pub requester_email: String,
    #[serde(rename = "zweck", skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Success payload of `POST /api/buchung`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BookingReceipt {
    #[serde(rename = "buchung_id")]
    pub booking_id: i64,
    pub status: BookingStatus,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_booking() {
        let json = r#"{
            "id": 7,
            "raum_id": 1,
            "raum_name": "Großer Saal",
            "start_datum": "2024-03-05T10:00:00",
            "end_datum": "2024-03-05T12:00:00",
            "benutzer_name": "Erika Musterfrau",
            "benutzer_email": "erika@example.org",
            "zweck": null,
            "status": "bestätigt"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.id, 7);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.is_selectable());
        assert_eq!(booking.purpose(), None);
        assert_eq!(booking.start.format("%H:%M").to_string(), "10:00");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = serde_json::from_str::<BookingStatus>(r#""storniert""#);
        assert!(err.is_err());
    }

    #[test]
    fn test_status_wire_names() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Rejected,
            BookingStatus::Deleted,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_new_booking_omits_missing_purpose() {
        let booking = NewBooking {
            room_id: 2,
            start: timestamp::parse("2024-03-05T10:00").unwrap(),
            end: timestamp::parse("2024-03-05T11:30").unwrap(),
            requester_name: "Max".to_string(),
            requester_email: "max@example.org".to_string(),
            purpose: None,
        };
        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["start_datum"], "2024-03-05T10:00:00");
        assert_eq!(value["end_datum"], "2024-03-05T11:30:00");
        assert!(value.get("zweck").is_none());
    }
}
