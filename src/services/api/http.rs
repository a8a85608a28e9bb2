use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::BookingApi;
use crate::errors::ApiError;
use crate::models::{
    AdminLogEntry, AdminSettings, AdminStats, Booking, BookingReceipt, NewBooking, Room,
};

/// `reqwest` client for the booking backend. The admin session lives in the
/// cookie store of the underlying client.
pub struct HttpBookingApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct RejectRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Deserialize)]
struct PinVerdict {
    #[serde(default)]
    valid: bool,
}

/// Maps auth and rate-limit statuses first, then `{"error": ...}` payloads,
/// then any other non-success status.
async fn read_body(resp: Response) -> Result<Value, ApiError> {
    let status = resp.status();
    match status {
        StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimited),
        _ => {}
    }

    let bytes = resp.bytes().await?;
    let body: Value = match serde_json::from_slice(&bytes) {
        Ok(body) => body,
        Err(_) if !status.is_success() => return Err(ApiError::Status(status)),
        Err(e) => return Err(ApiError::Decode(e)),
    };

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(ApiError::Domain(message.to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let body = read_body(resp).await?;
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let resp = self.client.get(self.url("/api/raeume")).send().await?;
        read_json(resp).await
    }

    async fn list_bookings(
        &self,
        room_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Booking>, ApiError> {
        let resp = self
            .client
            .get(self.url("/api/buchungen"))
            .query(&[
                ("raum_id", room_id.to_string()),
                ("jahr", year.to_string()),
                ("monat", month.to_string()),
            ])
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingReceipt, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/buchung"))
            .json(booking)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn confirm_booking(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url(&format!("/api/buchung/{id}/bestaetigen")))
            .send()
            .await?;
        read_body(resp).await.map(|_| ())
    }

    async fn reject_booking(&self, id: i64, reason: Option<&str>) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url(&format!("/api/buchung/{id}/ablehnen")))
            .json(&RejectRequest { message: reason })
            .send()
            .await?;
        read_body(resp).await.map(|_| ())
    }

    async fn delete_booking(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/buchung/{id}/loeschen")))
            .send()
            .await?;
        read_body(resp).await.map(|_| ())
    }

    async fn verify_pin(&self, pin: &str) -> Result<bool, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/admin/verify-pin"))
            .json(&json!({ "pin": pin }))
            .send()
            .await?;

        // A mismatch is answered with 401 and `{"valid": false}`, so the
        // generic status mapping does not apply here.
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        let status = resp.status();
        let bytes = resp.bytes().await?;
        match serde_json::from_slice::<PinVerdict>(&bytes) {
            Ok(verdict) => Ok(verdict.valid),
            Err(_) if !status.is_success() => Err(ApiError::Status(status)),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url("/api/admin/logout"))
            .json(&json!({}))
            .send()
            .await?;
        read_body(resp).await.map(|_| ())
    }

    async fn admin_settings(&self) -> Result<AdminSettings, ApiError> {
        let resp = self.client.get(self.url("/api/admin/settings")).send().await?;
        read_json(resp).await
    }

    async fn admin_logs(&self) -> Result<Vec<AdminLogEntry>, ApiError> {
        let resp = self.client.get(self.url("/api/admin/logs")).send().await?;
        read_json(resp).await
    }

    async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let resp = self.client.get(self.url("/api/admin/stats")).send().await?;
        read_json(resp).await
    }

    async fn update_room_manager_email(&self, email: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url("/api/admin/settings/saal-email"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        read_body(resp).await.map(|_| ())
    }
}
