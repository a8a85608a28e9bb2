use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use raumbuchung::config::AppConfig;
use raumbuchung::handlers::commands::{self, Command, HELP};
use raumbuchung::handlers::display;
use raumbuchung::models::Room;
use raumbuchung::services::api::http::HttpBookingApi;
use raumbuchung::services::api::BookingApi;
use raumbuchung::services::dialog::modal::ModalDialogs;
use raumbuchung::services::lifecycle::BookingController;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let api = Arc::new(HttpBookingApi::new(config.api_base_url.clone())?);
    let room = resolve_room(api.as_ref(), &config).await;
    tracing::info!(
        api = %config.api_base_url,
        room_id = room.id,
        room = %room.name,
        "starting booking client"
    );

    let (dialogs, host) = ModalDialogs::new();
    let controller = Arc::new(BookingController::new(
        api,
        Arc::new(dialogs),
        room,
        chrono::Local::now().date_naive(),
    ));

    tokio::spawn(display::run(controller.subscribe(), host.subscribe()));
    println!("{HELP}");
    controller.load_bookings().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // An open modal takes the line as its answer
        if let Some(view) = host.current() {
            match commands::parse_modal_answer(&view, &line) {
                Some(press) => {
                    host.press(press);
                }
                None => println!("Bitte mit `ja` oder `nein` antworten."),
            }
            continue;
        }

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move { commands::dispatch(&controller, command).await });
            }
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}

/// Uses the configured name, falling back to the backend's room list.
async fn resolve_room(api: &dyn BookingApi, config: &AppConfig) -> Room {
    let mut room = Room {
        id: config.room_id,
        name: config.room_name.clone(),
        description: None,
    };
    if room.name.is_empty() {
        match api.list_rooms().await {
            Ok(rooms) => {
                if let Some(found) = rooms.into_iter().find(|r| r.id == config.room_id) {
                    room = found;
                } else {
                    tracing::warn!(room_id = config.room_id, "room not listed by backend");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to load rooms"),
        }
    }
    if room.name.is_empty() {
        room.name = format!("Raum {}", room.id);
    }
    room
}
