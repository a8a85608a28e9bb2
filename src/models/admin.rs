use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;
use super::BookingStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AdminSettings {
    #[serde(default)]
    pub admin_email: String,
    #[serde(rename = "saal_verantwortlicher_email", default)]
    pub room_manager_email: Option<String>,
}

/// One row of the notification log shown in the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminLogEntry {
    pub id: i64,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub status_text: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdminStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub rejected: u64,
    pub deleted: u64,
}
