use std::fmt::Write;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::services::calendar::{
    render, status_label, status_tone, BookingAction, MonthGrid, View, DAY_NAMES,
};
use crate::services::dialog::modal::ModalView;
use crate::services::session::{AdminPanel, LogsView};
use crate::state::AppState;

enum Frame {
    State(Box<AppState>),
    Modal(Option<ModalView>),
}

/// Prints the view on every state change and every newly shown modal.
pub async fn run(
    state: watch::Receiver<AppState>,
    modal: watch::Receiver<Option<ModalView>>,
) {
    let states = WatchStream::new(state).map(|s| Frame::State(Box::new(s)));
    let modals = WatchStream::new(modal).map(Frame::Modal);
    let mut frames = states.merge(modals);

    while let Some(frame) = frames.next().await {
        match frame {
            Frame::State(state) => println!("{}", view_text(&render(&state))),
            Frame::Modal(Some(view)) => println!("{}", modal_text(&view)),
            Frame::Modal(None) => {}
        }
    }
}

pub fn modal_text(view: &ModalView) -> String {
    match view {
        ModalView::Confirm {
            title,
            message,
            input_label,
        } => {
            let mut out = format!("\n== {title} ==\n{message}\n");
            match input_label {
                Some(label) => {
                    let _ = write!(out, "{label}\n[ja <text> / nein]");
                }
                None => out.push_str("[ja / nein]"),
            }
            out
        }
        ModalView::Alert {
            title,
            message,
            severity,
        } => format!("\n== {title} ({}) ==\n{message}\n[Enter]", severity.as_str()),
    }
}

pub fn view_text(view: &View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n#### {} ####", view.room_name);
    out.push_str(&grid_text(&view.grid));

    out.push_str("\nBuchungen:\n");
    if view.list.is_empty() {
        out.push_str("  Keine Buchungen vorhanden.\n");
    }
    for item in &view.list {
        let _ = writeln!(
            out,
            "  [{}] {} ({}) {} {}",
            item.booking_id,
            item.requester_name,
            status_label(item.status),
            item.date,
            item.time_range
        );
        let _ = writeln!(out, "       E-Mail: {}", item.requester_email);
        if let Some(purpose) = &item.purpose {
            let _ = writeln!(out, "       Zweck: {purpose}");
        }
        if !item.actions.is_empty() {
            let actions: Vec<&str> = item
                .actions
                .iter()
                .map(|a| match a {
                    BookingAction::Confirm => "confirm",
                    BookingAction::Reject => "reject",
                    BookingAction::Delete => "delete",
                })
                .collect();
            let _ = writeln!(out, "       Aktionen: {}", actions.join(", "));
        }
    }

    if let Some(booking) = &view.detail {
        let _ = writeln!(
            out,
            "\nDetails: {} am {} von {} bis {} Uhr{}",
            booking.requester_name,
            booking.start.format("%d.%m.%Y"),
            booking.start.format("%H:%M"),
            booking.end.format("%H:%M"),
            booking
                .purpose()
                .map(|p| format!(" ({p})"))
                .unwrap_or_default()
        );
    }

    if let Some(panel) = &view.admin {
        out.push_str(&admin_text(panel));
    }
    out
}

fn grid_text(grid: &MonthGrid) -> String {
    let mut out = format!("{}\n", grid.title);
    for name in DAY_NAMES {
        let _ = write!(out, "{name:<12}");
    }
    out.push('\n');

    let mut column = grid.leading_blanks as usize;
    out.push_str(&" ".repeat(12 * column));
    for cell in &grid.days {
        let marks: Vec<String> = cell
            .indicators
            .iter()
            .map(|i| {
                if i.clickable {
                    format!("{}*", i.start_time)
                } else {
                    i.start_time.clone()
                }
            })
            .collect();
        let day = cell.date.format("%e").to_string();
        let past = if cell.past { "." } else { " " };
        let text = if marks.is_empty() {
            format!("{day}{past}")
        } else {
            format!("{day}{past}{}", marks.join(","))
        };
        let _ = write!(out, "{text:<12}");

        column += 1;
        if column == 7 {
            out.push('\n');
            column = 0;
        }
    }
    if column != 0 {
        out.push('\n');
    }
    out
}

fn admin_text(panel: &AdminPanel) -> String {
    let mut out = String::from("\n---- Admin ----\n");
    if let Some(settings) = &panel.settings {
        let _ = writeln!(out, "Admin-E-Mail: {}", settings.admin_email);
        let _ = writeln!(
            out,
            "Saal-Verantwortliche(r): {}",
            settings.room_manager_email.as_deref().unwrap_or("")
        );
    }
    if let Some(stats) = &panel.stats {
        let _ = writeln!(
            out,
            "Gesamt {} | ausstehend {} | bestätigt {} | abgelehnt {} | gelöscht {}",
            stats.total, stats.pending, stats.confirmed, stats.rejected, stats.deleted
        );
    }
    match &panel.logs {
        LogsView::Loading => out.push_str("Log: wird geladen...\n"),
        LogsView::Failed => out.push_str("Log: Fehler beim Laden.\n"),
        LogsView::Loaded(entries) if entries.is_empty() => {
            out.push_str("Log: Keine Einträge vorhanden.\n")
        }
        LogsView::Loaded(entries) => {
            for entry in entries {
                let status = entry
                    .status_text
                    .clone()
                    .unwrap_or_else(|| status_label(entry.status).to_string());
                let _ = writeln!(
                    out,
                    "  {} [{}] {} | {} | {} | {}",
                    entry.timestamp.format("%d.%m.%Y %H:%M"),
                    status_tone(entry.status),
                    entry.message,
                    entry.details,
                    entry.email,
                    status
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{timestamp, Booking, BookingStatus, Room};

    #[test]
    fn test_view_text_marks_clickable_indicators() {
        let room = Room {
            id: 1,
            name: "Gemeindesaal".to_string(),
            description: None,
        };
        let mut state = AppState::new(room, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        state.bookings = vec![Booking {
            id: 9,
            room_id: 1,
            room_name: None,
            start: timestamp::parse("2024-03-05T10:00").unwrap(),
            end: timestamp::parse("2024-03-05T12:00").unwrap(),
            requester_name: "Max".to_string(),
            requester_email: "max@example.org".to_string(),
            purpose: None,
            status: BookingStatus::Confirmed,
        }];

        let text = view_text(&render(&state));
        assert!(text.contains("Gemeindesaal"));
        assert!(text.contains("März 2024"));
        assert!(text.contains("10:00*"));
        assert!(text.contains("[9] Max (Bestätigt)"));
        assert!(!text.contains("Aktionen"));
        assert!(!text.contains("---- Admin ----"));
    }
}
