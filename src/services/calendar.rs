//! Pure rendering of [`AppState`] into what the front end displays.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{Booking, BookingStatus};
use crate::services::session::AdminPanel;
use crate::state::AppState;

pub const MONTH_NAMES: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];

/// Sunday first, matching the grid layout.
pub const DAY_NAMES: [&str; 7] = ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Reject,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub booking_id: i64,
    pub status: BookingStatus,
    pub start_time: String,
    pub clickable: bool,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub past: bool,
    pub indicators: Vec<Indicator>,
}

impl DayCell {
    /// Past days do not open the booking form.
    pub fn bookable(&self) -> bool {
        !self.past
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days.iter().find(|c| c.date.day() == day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub booking_id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub status: BookingStatus,
    pub date: String,
    pub time_range: String,
    pub purpose: Option<String>,
    pub actions: Vec<BookingAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub room_name: String,
    pub grid: MonthGrid,
    pub list: Vec<ListItem>,
    pub detail: Option<Booking>,
    pub admin: Option<AdminPanel>,
}

pub fn render(state: &AppState) -> View {
    let is_admin = state.is_admin();
    View {
        room_name: state.room().name.clone(),
        grid: month_grid(state.year, state.month, state.today, &state.bookings),
        list: booking_list(&state.bookings, is_admin),
        detail: state.detail().cloned(),
        admin: state.session.panel().cloned(),
    }
}

pub fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "Ausstehend",
        BookingStatus::Confirmed => "Bestätigt",
        BookingStatus::Rejected => "Abgelehnt",
        BookingStatus::Deleted => "Gelöscht",
    }
}

/// Tone tag used for log entries and status badges.
pub fn status_tone(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => "success",
        BookingStatus::Rejected => "error",
        BookingStatus::Pending => "warning",
        BookingStatus::Deleted => "deleted",
    }
}

pub fn month_title(year: i32, month: u32) -> String {
    let name = month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?");
    format!("{name} {year}")
}

pub fn short_weekday(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_sunday() as usize]
}

pub fn actions_for(booking: &Booking, is_admin: bool) -> Vec<BookingAction> {
    if !is_admin {
        return Vec::new();
    }
    let mut actions = Vec::new();
    if booking.status == BookingStatus::Pending {
        actions.push(BookingAction::Confirm);
        actions.push(BookingAction::Reject);
    }
    actions.push(BookingAction::Delete);
    actions
}

pub fn month_grid(year: i32, month: u32, today: NaiveDate, bookings: &[Booking]) -> MonthGrid {
    let title = month_title(year, month);
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthGrid {
            title,
            leading_blanks: 0,
            days: Vec::new(),
        };
    };

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let mut on_day: Vec<&Booking> =
                bookings.iter().filter(|b| b.start.date() == date).collect();
            on_day.sort_by_key(|b| b.start);
            DayCell {
                date,
                past: date < today,
                indicators: on_day.into_iter().map(indicator).collect(),
            }
        })
        .collect();

    MonthGrid {
        title,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    }
}

fn indicator(booking: &Booking) -> Indicator {
    let clickable = booking.is_selectable();
    let title = if clickable {
        format!("{} - Klicken für Details", booking.requester_name)
    } else {
        format!("{} - {}", booking.requester_name, booking.status.as_str())
    };
    Indicator {
        booking_id: booking.id,
        status: booking.status,
        start_time: booking.start.format("%H:%M").to_string(),
        clickable,
        title,
    }
}

/// Flat chronological list for the admin view.
pub fn booking_list(bookings: &[Booking], is_admin: bool) -> Vec<ListItem> {
    let mut sorted: Vec<&Booking> = bookings.iter().collect();
    sorted.sort_by_key(|b| (b.start, b.id));
    sorted
        .into_iter()
        .map(|b| ListItem {
            booking_id: b.id,
            requester_name: b.requester_name.clone(),
            requester_email: b.requester_email.clone(),
            status: b.status,
            date: format!(
                "{}., {}",
                short_weekday(b.start.weekday()),
                b.start.format("%d.%m.%Y")
            ),
            time_range: format!(
                "{} - {} Uhr",
                b.start.format("%H:%M"),
                b.end.format("%H:%M")
            ),
            purpose: b.purpose().map(str::to_string),
            actions: actions_for(b, is_admin),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp;

    fn booking(id: i64, start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            room_id: 1,
            room_name: None,
            start: timestamp::parse(start).unwrap(),
            end: timestamp::parse(end).unwrap(),
            requester_name: format!("Person {id}"),
            requester_email: format!("person{id}@example.org"),
            purpose: None,
            status,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_cell_indicators() {
        let bookings = vec![
            booking(1, "2024-03-05T10:00", "2024-03-05T12:00", BookingStatus::Confirmed),
            booking(2, "2024-03-05T14:00", "2024-03-05T15:00", BookingStatus::Pending),
        ];
        let grid = month_grid(2024, 3, date(2024, 3, 1), &bookings);

        let cell = grid.day(5).unwrap();
        assert_eq!(cell.indicators.len(), 2);
        assert!(cell.indicators[0].clickable);
        assert_eq!(cell.indicators[0].start_time, "10:00");
        assert!(!cell.indicators[1].clickable);
        assert_eq!(cell.indicators[1].title, "Person 2 - ausstehend");
        assert!(grid.day(6).unwrap().indicators.is_empty());
    }

    #[test]
    fn test_grid_layout() {
        // 1 March 2024 is a Friday
        let grid = month_grid(2024, 3, date(2024, 3, 10), &[]);
        assert_eq!(grid.title, "März 2024");
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.days.len(), 31);
        assert!(grid.day(9).unwrap().past);
        assert!(!grid.day(9).unwrap().bookable());
        assert!(grid.day(10).unwrap().bookable());

        let february = month_grid(2024, 2, date(2024, 1, 1), &[]);
        assert_eq!(february.days.len(), 29);
    }

    #[test]
    fn test_bookings_of_other_months_are_not_placed() {
        let bookings = vec![booking(
            1,
            "2024-04-05T10:00",
            "2024-04-05T11:00",
            BookingStatus::Confirmed,
        )];
        let grid = month_grid(2024, 3, date(2024, 3, 1), &bookings);
        assert!(grid.days.iter().all(|c| c.indicators.is_empty()));
    }

    #[test]
    fn test_list_is_chronological_with_admin_actions() {
        let bookings = vec![
            booking(3, "2024-03-20T09:00", "2024-03-20T10:00", BookingStatus::Rejected),
            booking(1, "2024-03-05T10:00", "2024-03-05T12:00", BookingStatus::Pending),
        ];

        let list = booking_list(&bookings, true);
        assert_eq!(list[0].booking_id, 1);
        assert_eq!(list[0].date, "Di., 05.03.2024");
        assert_eq!(list[0].time_range, "10:00 - 12:00 Uhr");
        assert_eq!(
            list[0].actions,
            vec![BookingAction::Confirm, BookingAction::Reject, BookingAction::Delete]
        );
        assert_eq!(list[1].actions, vec![BookingAction::Delete]);

        let public = booking_list(&bookings, false);
        assert!(public.iter().all(|item| item.actions.is_empty()));
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(status_label(BookingStatus::Confirmed), "Bestätigt");
        assert_eq!(status_tone(BookingStatus::Deleted), "deleted");
        assert_eq!(short_weekday(Weekday::Sun), "So");
    }
}
