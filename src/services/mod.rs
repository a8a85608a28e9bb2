pub mod api;
pub mod calendar;
pub mod dialog;
pub mod lifecycle;
pub mod session;
