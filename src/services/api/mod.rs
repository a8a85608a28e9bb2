pub mod http;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{
    AdminLogEntry, AdminSettings, AdminStats, Booking, BookingReceipt, NewBooking, Room,
};

/// The booking backend. The server is authoritative for validation, conflict
/// detection and persistence; implementations only transport requests.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError>;

    async fn list_bookings(
        &self,
        room_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Booking>, ApiError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<BookingReceipt, ApiError>;

    async fn confirm_booking(&self, id: i64) -> Result<(), ApiError>;

    /// `reason` is sent as `message` only when present.
    async fn reject_booking(&self, id: i64, reason: Option<&str>) -> Result<(), ApiError>;

    async fn delete_booking(&self, id: i64) -> Result<(), ApiError>;

    /// `Ok(false)` is a PIN mismatch, `Err(RateLimited)` means too many attempts.
    async fn verify_pin(&self, pin: &str) -> Result<bool, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn admin_settings(&self) -> Result<AdminSettings, ApiError>;

    async fn admin_logs(&self) -> Result<Vec<AdminLogEntry>, ApiError>;

    async fn admin_stats(&self) -> Result<AdminStats, ApiError>;

    async fn update_room_manager_email(&self, email: &str) -> Result<(), ApiError>;
}
