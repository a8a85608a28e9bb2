pub mod admin;
pub mod booking;
pub mod room;
pub mod timestamp;

pub use admin::{AdminLogEntry, AdminSettings, AdminStats};
pub use booking::{Booking, BookingReceipt, BookingStatus, NewBooking};
pub use room::Room;
