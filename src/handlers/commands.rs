use chrono::{NaiveDate, NaiveTime};

use crate::services::dialog::modal::{ModalView, Press};
use crate::services::lifecycle::{BookingController, BookingRequest, Outcome};

pub const HELP: &str = "\
Befehle:
  next | prev                 Monat vor/zurück
  refresh                     Buchungen neu laden
  show <id>                   Details einer bestätigten Buchung
  close                       Detailansicht schließen
  book <datum> <von> <bis> <email> <name> [| zweck]
                              z.B. book 2024-03-05 10:00 12:00 max@example.org Max Muster | Probe
  admin                       Admin-Modus an/aus (öffnet PIN-Abfrage)
  pin <pin>                   PIN prüfen
  confirm <id> | reject <id> | delete <id>
  email [adresse]             Saal-Verantwortlichen E-Mail setzen (leer = entfernen)
  quit";

const BOOK_USAGE: &str = "book <YYYY-MM-DD> <HH:MM> <HH:MM> <email> <name> [| zweck]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Refresh,
    Next,
    Previous,
    Show(i64),
    Close,
    Book(BookingRequest),
    Admin,
    Pin(String),
    Confirm(i64),
    Reject(i64),
    Delete(i64),
    Email(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_lowercase().as_str() {
            "" | "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "refresh" => Ok(Command::Refresh),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Previous),
            "close" => Ok(Command::Close),
            "admin" => Ok(Command::Admin),
            "show" => parse_id(rest, "show <id>").map(Command::Show),
            "confirm" => parse_id(rest, "confirm <id>").map(Command::Confirm),
            "reject" => parse_id(rest, "reject <id>").map(Command::Reject),
            "delete" => parse_id(rest, "delete <id>").map(Command::Delete),
            "pin" if !rest.is_empty() => Ok(Command::Pin(rest.to_string())),
            "pin" => Err(CommandError::Usage("pin <pin>")),
            "email" => Ok(Command::Email(rest.to_string())),
            "book" => parse_booking(rest).map(Command::Book),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(rest: &str, usage: &'static str) -> Result<i64, CommandError> {
    rest.parse().map_err(|_| CommandError::Usage(usage))
}

fn parse_booking(rest: &str) -> Result<BookingRequest, CommandError> {
    let usage = || CommandError::Usage(BOOK_USAGE);
    let (fields, purpose) = match rest.split_once('|') {
        Some((fields, purpose)) => (fields, Some(purpose.trim().to_string())),
        None => (rest, None),
    };

    let mut parts = fields.split_whitespace();
    let date = parts
        .next()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(usage)?;
    let start = parts.next().and_then(parse_time).ok_or_else(usage)?;
    let end = parts.next().and_then(parse_time).ok_or_else(usage)?;
    let email = parts.next().ok_or_else(usage)?.to_string();
    let name = parts.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(usage());
    }

    Ok(BookingRequest {
        date,
        start,
        end,
        name,
        email,
        purpose: purpose.filter(|p| !p.is_empty()),
    })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Maps a typed line onto a button of the shown modal. Confirm dialogs take
/// `ja [text]` or `nein`; alerts close on any line.
pub fn parse_modal_answer(view: &ModalView, line: &str) -> Option<Press> {
    match view {
        ModalView::Alert { .. } => Some(Press::Ok),
        ModalView::Confirm { .. } => {
            let line = line.trim();
            let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            match word.to_lowercase().as_str() {
                "j" | "ja" | "y" | "yes" => Some(Press::Yes(rest.trim().to_string())),
                "n" | "nein" | "no" => Some(Press::No),
                _ => None,
            }
        }
    }
}

pub async fn dispatch(controller: &BookingController, command: Command) {
    let outcome = match command {
        Command::Help => {
            println!("{HELP}");
            None
        }
        Command::Quit => None,
        Command::Refresh => {
            controller.load_bookings().await;
            if controller.snapshot().is_admin() {
                controller.load_admin_views().await;
            }
            None
        }
        Command::Next => {
            controller.show_next_month().await;
            None
        }
        Command::Previous => {
            controller.show_previous_month().await;
            None
        }
        Command::Show(id) => {
            if !controller.open_detail(id) {
                println!("Buchung {id} hat keine Detailansicht.");
            }
            None
        }
        Command::Close => {
            controller.close_detail();
            controller.close_submission();
            controller.close_pin_prompt();
            None
        }
        Command::Book(request) => {
            if controller.open_submission(request.date) {
                Some(controller.submit(request).await)
            } else {
                println!("Vergangene Tage können nicht gebucht werden.");
                None
            }
        }
        Command::Admin => Some(controller.toggle_admin().await),
        Command::Pin(pin) => {
            if controller.snapshot().pin_prompt.is_none() {
                controller.open_pin_prompt();
            }
            controller.enter_pin(&pin);
            Some(controller.verify_pin().await)
        }
        Command::Confirm(id) => Some(controller.confirm_booking(id).await),
        Command::Reject(id) => Some(controller.reject_booking(id).await),
        Command::Delete(id) => Some(controller.delete_booking(id).await),
        Command::Email(email) => Some(controller.save_room_manager_email(&email).await),
    };

    if let Some(Outcome::NotOffered) = outcome {
        println!("Diese Aktion ist gerade nicht verfügbar.");
    }
    if let Some(outcome) = outcome {
        tracing::debug!(?outcome, "command finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dialog::Severity;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("next"), Ok(Command::Next));
        assert_eq!(Command::parse("  P "), Ok(Command::Previous));
        assert_eq!(Command::parse("confirm 12"), Ok(Command::Confirm(12)));
        assert_eq!(Command::parse("email"), Ok(Command::Email(String::new())));
        assert_eq!(
            Command::parse("delete x"),
            Err(CommandError::Usage("delete <id>"))
        );
        assert!(matches!(
            Command::parse("dance"),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_book() {
        let cmd = Command::parse(
            "book 2024-03-05 10:00 12:00 max@example.org Max Mustermann | Chorprobe",
        )
        .unwrap();
        let Command::Book(request) = cmd else {
            panic!("expected book command");
        };
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(request.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(request.name, "Max Mustermann");
        assert_eq!(request.email, "max@example.org");
        assert_eq!(request.purpose.as_deref(), Some("Chorprobe"));

        assert_eq!(
            Command::parse("book 2024-03-05 10:00 max@example.org"),
            Err(CommandError::Usage(BOOK_USAGE))
        );
    }

    #[test]
    fn test_modal_answers() {
        let confirm = ModalView::Confirm {
            title: "Buchung ablehnen".to_string(),
            message: "Wirklich?".to_string(),
            input_label: Some("Grund".to_string()),
        };
        assert_eq!(
            parse_modal_answer(&confirm, "ja Raum nicht verfügbar"),
            Some(Press::Yes("Raum nicht verfügbar".to_string()))
        );
        assert_eq!(parse_modal_answer(&confirm, "j"), Some(Press::Yes(String::new())));
        assert_eq!(parse_modal_answer(&confirm, "nein"), Some(Press::No));
        assert_eq!(parse_modal_answer(&confirm, "vielleicht"), None);

        let alert = ModalView::Alert {
            title: "Erfolg".to_string(),
            message: "ok".to_string(),
            severity: Severity::Success,
        };
        assert_eq!(parse_modal_answer(&alert, ""), Some(Press::Ok));
    }
}
