use chrono::{Datelike, NaiveDate};

use crate::models::{Booking, Room};
use crate::services::session::SessionGate;

/// The booking dialog, opened from a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PinPrompt {
    pub input: String,
}

/// Everything the view is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    room: Room,
    pub today: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub bookings: Vec<Booking>,
    pub session: SessionGate,
    pub submission: Option<SubmissionForm>,
    pub pin_prompt: Option<PinPrompt>,
    /// Id of the booking shown in the detail view.
    pub detail_id: Option<i64>,
}

impl AppState {
    pub fn new(room: Room, today: NaiveDate) -> Self {
        Self {
            room,
            today,
            year: today.year(),
            month: today.month(),
            bookings: Vec::new(),
            session: SessionGate::default(),
            submission: None,
            pin_prompt: None,
            detail_id: None,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn booking(&self, id: i64) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// The booking in the detail view, looked up in the current store. A
    /// booking that left the store or is no longer confirmed has no detail.
    pub fn detail(&self) -> Option<&Booking> {
        self.detail_id
            .and_then(|id| self.booking(id))
            .filter(|b| b.is_selectable())
    }

    /// Moves the displayed month by `delta`, wrapping across years.
    pub fn shift_month(&mut self, delta: i32) {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        self.year = index.div_euclid(12);
        self.month = index.rem_euclid(12) as u32 + 1;
    }
}
