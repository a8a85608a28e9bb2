//! Booking lifecycle controller.
//!
//! Owns the [`AppState`] and is the only writer of it. Every operation is an
//! independent round trip against the backend; state is changed only after a
//! response arrives, in a synchronous section, and every change is published to
//! subscribers for re-rendering. Booking statuses are never changed locally:
//! after a successful mutation the store is re-fetched.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::watch;

use crate::errors::ApiError;
use crate::models::{AdminSettings, NewBooking, Room};
use crate::services::api::BookingApi;
use crate::services::calendar::{actions_for, BookingAction};
use crate::services::dialog::{ConfirmOptions, Dialogs, Severity};
use crate::services::session::LogsView;
use crate::state::{AppState, PinPrompt, SubmissionForm};

const SESSION_EXPIRED: &str = "Ihre Admin-Session ist abgelaufen. Bitte melden Sie sich erneut an.";
const SUBMITTED: &str = "Ihre Buchungsanfrage wurde gesendet und wartet auf Bestätigung!";
const WRONG_PIN: &str = "Falsche PIN! Bitte versuchen Sie es erneut.";
const TOO_MANY_ATTEMPTS: &str =
    "Zu viele Versuche! Bitte warten Sie 15 Minuten, bevor Sie es erneut versuchen.";

/// Which path an operation took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user declined the confirmation dialog.
    Cancelled,
    /// The action is not available in the current state; nothing was sent.
    NotOffered,
    /// Rejected before or by the backend as invalid input (bad e-mail, wrong PIN).
    Invalid,
    DomainError(String),
    SessionExpired,
    RateLimited,
    Failed,
}

/// Input of the booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub name: String,
    pub email: String,
    pub purpose: Option<String>,
}

impl BookingRequest {
    pub fn into_new_booking(self, room_id: i64) -> NewBooking {
        NewBooking {
            room_id,
            start: self.date.and_time(self.start),
            end: self.date.and_time(self.end),
            requester_name: self.name,
            requester_email: self.email,
            purpose: self.purpose.filter(|p| !p.trim().is_empty()),
        }
    }
}

pub struct BookingController {
    api: Arc<dyn BookingApi>,
    dialogs: Arc<dyn Dialogs>,
    state: watch::Sender<AppState>,
}

impl BookingController {
    pub fn new(
        api: Arc<dyn BookingApi>,
        dialogs: Arc<dyn Dialogs>,
        room: Room,
        today: NaiveDate,
    ) -> Self {
        let (state, _) = watch::channel(AppState::new(room, today));
        Self {
            api,
            dialogs,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    // ── Booking store ──

    /// Fetches the displayed month. Failures are logged and keep the
    /// current bookings.
    pub async fn load_bookings(&self) {
        let (room_id, year, month) = {
            let s = self.state.borrow();
            (s.room().id, s.year, s.month)
        };

        match self.api.list_bookings(room_id, year, month).await {
            Ok(bookings) => {
                let count = bookings.len();
                let applied = self.state.send_if_modified(|s| {
                    if (s.year, s.month) != (year, month) {
                        return false;
                    }
                    s.bookings = bookings;
                    if s.detail().is_none() {
                        s.detail_id = None;
                    }
                    true
                });
                if applied {
                    tracing::debug!(room_id, year, month, count, "bookings loaded");
                } else {
                    tracing::debug!(year, month, "discarding bookings for a month no longer shown");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, room_id, year, month, "failed to load bookings");
            }
        }
    }

    pub async fn show_previous_month(&self) {
        self.state.send_modify(|s| {
            s.shift_month(-1);
            s.detail_id = None;
        });
        self.load_bookings().await;
    }

    pub async fn show_next_month(&self) {
        self.state.send_modify(|s| {
            s.shift_month(1);
            s.detail_id = None;
        });
        self.load_bookings().await;
    }

    /// Opens the detail view. Only confirmed bookings have one.
    pub fn open_detail(&self, booking_id: i64) -> bool {
        self.state.send_if_modified(|s| {
            let selectable = s
                .booking(booking_id)
                .is_some_and(|b| b.is_selectable());
            if selectable {
                s.detail_id = Some(booking_id);
            }
            selectable
        })
    }

    pub fn close_detail(&self) {
        self.state.send_if_modified(|s| s.detail_id.take().is_some());
    }

    // ── Submission ──

    /// Opens the booking form for `date`. Past days are refused.
    pub fn open_submission(&self, date: NaiveDate) -> bool {
        self.state.send_if_modified(|s| {
            if date < s.today {
                return false;
            }
            s.submission = Some(SubmissionForm { date });
            true
        })
    }

    pub fn close_submission(&self) {
        self.state.send_if_modified(|s| s.submission.take().is_some());
    }

    pub async fn submit(&self, request: BookingRequest) -> Outcome {
        let room_id = self.state.borrow().room().id;
        let booking = request.into_new_booking(room_id);

        match self.api.create_booking(&booking).await {
            Ok(receipt) => {
                tracing::info!(
                    booking_id = receipt.booking_id,
                    room_id,
                    start = %booking.start,
                    "booking request submitted"
                );
                self.dialogs.alert(SUBMITTED, "Erfolg", Severity::Success).await;
                self.close_submission();
                self.load_bookings().await;
                Outcome::Done
            }
            Err(ApiError::Domain(message)) => {
                tracing::warn!(room_id, %message, "booking request refused");
                self.show_domain_error(&message).await;
                Outcome::DomainError(message)
            }
            Err(e) => {
                tracing::error!(error = %e, room_id, "failed to submit booking request");
                self.dialogs
                    .alert(
                        "Es gab einen Fehler beim Senden der Buchungsanfrage.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                Outcome::Failed
            }
        }
    }

    // ── Admin actions ──

    fn offered(&self, booking_id: i64, action: BookingAction) -> bool {
        let s = self.state.borrow();
        s.booking(booking_id)
            .map(|b| actions_for(b, s.is_admin()).contains(&action))
            .unwrap_or(false)
    }

    pub async fn confirm_booking(&self, booking_id: i64) -> Outcome {
        if !self.offered(booking_id, BookingAction::Confirm) {
            tracing::warn!(booking_id, "confirm not offered");
            return Outcome::NotOffered;
        }
        let answer = self
            .dialogs
            .confirm(
                "Möchten Sie diese Buchung wirklich bestätigen?",
                "Buchung bestätigen",
                ConfirmOptions::default(),
            )
            .await;
        if !answer.confirmed {
            return Outcome::Cancelled;
        }

        match self.api.confirm_booking(booking_id).await {
            Ok(()) => {
                tracing::info!(booking_id, "booking confirmed");
                self.finish_mutation("Buchung wurde bestätigt!").await;
                Outcome::Done
            }
            Err(ApiError::Unauthorized) => {
                self.expire_session(true).await;
                Outcome::SessionExpired
            }
            Err(ApiError::Domain(message)) => {
                tracing::warn!(booking_id, %message, "confirm refused");
                self.show_domain_error(&message).await;
                Outcome::DomainError(message)
            }
            Err(e) => {
                tracing::error!(error = %e, booking_id, "failed to confirm booking");
                self.dialogs
                    .alert(
                        "Es gab einen Fehler beim Bestätigen der Buchung.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                Outcome::Failed
            }
        }
    }

    /// Rejects with an optional reason. A blank reason is not sent at all.
    pub async fn reject_booking(&self, booking_id: i64) -> Outcome {
        if !self.offered(booking_id, BookingAction::Reject) {
            tracing::warn!(booking_id, "reject not offered");
            return Outcome::NotOffered;
        }
        let answer = self
            .dialogs
            .confirm(
                "Möchten Sie diese Buchung wirklich ablehnen?",
                "Buchung ablehnen",
                ConfirmOptions::with_input("Grund der Ablehnung (optional):"),
            )
            .await;
        if !answer.confirmed {
            return Outcome::Cancelled;
        }
        let reason = answer.input_value.filter(|r| !r.trim().is_empty());

        match self.api.reject_booking(booking_id, reason.as_deref()).await {
            Err(ApiError::Unauthorized) => {
                self.expire_session(true).await;
                Outcome::SessionExpired
            }
            Ok(()) | Err(ApiError::Domain(_)) => {
                // Error payloads are not surfaced for rejections
                tracing::info!(booking_id, with_reason = reason.is_some(), "booking rejected");
                self.finish_mutation("Buchung wurde abgelehnt.").await;
                Outcome::Done
            }
            Err(e) => {
                tracing::error!(error = %e, booking_id, "failed to reject booking");
                self.dialogs
                    .alert(
                        "Es gab einen Fehler beim Ablehnen der Buchung.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                Outcome::Failed
            }
        }
    }

    /// Soft delete: the booking is marked inactive and stays in the history.
    pub async fn delete_booking(&self, booking_id: i64) -> Outcome {
        if !self.offered(booking_id, BookingAction::Delete) {
            tracing::warn!(booking_id, "delete not offered");
            return Outcome::NotOffered;
        }
        let answer = self
            .dialogs
            .confirm(
                "Möchten Sie diese Buchung wirklich löschen? Sie wird als inaktiv markiert und bleibt im Verlauf sichtbar.",
                "Buchung löschen",
                ConfirmOptions::default(),
            )
            .await;
        if !answer.confirmed {
            return Outcome::Cancelled;
        }

        match self.api.delete_booking(booking_id).await {
            Err(ApiError::Unauthorized) => {
                self.expire_session(true).await;
                Outcome::SessionExpired
            }
            Ok(()) | Err(ApiError::Domain(_)) => {
                tracing::info!(booking_id, "booking deleted");
                self.finish_mutation("Buchung wurde erfolgreich gelöscht.").await;
                Outcome::Done
            }
            Err(e) => {
                tracing::error!(error = %e, booking_id, "failed to delete booking");
                self.dialogs
                    .alert(
                        "Es gab einen Fehler beim Löschen der Buchung.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                Outcome::Failed
            }
        }
    }

    async fn finish_mutation(&self, notice: &str) {
        self.dialogs.alert(notice, "Erfolg", Severity::Success).await;
        if self.is_admin() {
            tokio::join!(
                self.load_bookings(),
                self.load_admin_logs(),
                self.load_admin_stats()
            );
        } else {
            self.load_bookings().await;
        }
    }

    async fn show_domain_error(&self, message: &str) {
        self.dialogs
            .alert(&format!("Fehler: {message}"), "Fehler", Severity::Error)
            .await;
    }

    /// Authoritative demotion after a 401.
    async fn expire_session(&self, notify: bool) {
        if self.state.send_if_modified(|s| s.session.demote()) {
            tracing::warn!("admin session expired");
        }
        if notify {
            self.dialogs
                .alert(SESSION_EXPIRED, "Session abgelaufen", Severity::Warning)
                .await;
        }
    }

    // ── Session ──

    /// Logs out in admin mode, otherwise opens the PIN prompt.
    pub async fn toggle_admin(&self) -> Outcome {
        if self.is_admin() {
            self.logout().await
        } else {
            self.open_pin_prompt();
            Outcome::Done
        }
    }

    /// Only offered outside admin mode.
    pub fn open_pin_prompt(&self) -> bool {
        self.state.send_if_modified(|s| {
            if s.is_admin() {
                return false;
            }
            s.pin_prompt = Some(PinPrompt::default());
            true
        })
    }

    pub fn close_pin_prompt(&self) {
        self.state.send_if_modified(|s| s.pin_prompt.take().is_some());
    }

    pub fn enter_pin(&self, input: &str) {
        self.state.send_if_modified(|s| match s.pin_prompt.as_mut() {
            Some(prompt) => {
                prompt.input = input.to_string();
                true
            }
            None => false,
        });
    }

    fn clear_pin_input(&self) {
        self.enter_pin("");
    }

    pub async fn verify_pin(&self) -> Outcome {
        let pin = self.state.borrow().pin_prompt.as_ref().map(|p| p.input.clone());
        let Some(pin) = pin else {
            return Outcome::NotOffered;
        };
        if self.is_admin() {
            // The server clears its session on a mismatch
            tracing::warn!("pin verification not offered in admin mode");
            self.close_pin_prompt();
            return Outcome::NotOffered;
        }

        match self.api.verify_pin(&pin).await {
            Ok(true) => {
                self.state.send_modify(|s| {
                    s.session.promote();
                    s.pin_prompt = None;
                });
                tracing::info!("admin session established");
                self.load_admin_views().await;
                Outcome::Done
            }
            Ok(false) => {
                tracing::warn!("wrong admin pin");
                self.dialogs.alert(WRONG_PIN, "Falsche PIN", Severity::Error).await;
                self.clear_pin_input();
                Outcome::Invalid
            }
            Err(ApiError::RateLimited) => {
                tracing::warn!("pin verification rate limited");
                self.close_pin_prompt();
                self.dialogs
                    .alert(TOO_MANY_ATTEMPTS, "Zu viele Versuche", Severity::Warning)
                    .await;
                Outcome::RateLimited
            }
            Err(e) => {
                tracing::error!(error = %e, "pin verification failed");
                self.dialogs
                    .alert(
                        "Fehler bei der PIN-Überprüfung. Bitte versuchen Sie es erneut.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                self.clear_pin_input();
                Outcome::Failed
            }
        }
    }

    /// Drops admin mode locally first, then tells the server. A failed server
    /// call is only logged.
    pub async fn logout(&self) -> Outcome {
        self.state.send_modify(|s| {
            s.session.demote();
        });
        tracing::info!("admin mode left");

        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "server logout failed");
        }
        Outcome::Done
    }

    // ── Admin panel ──

    pub async fn load_admin_views(&self) {
        tokio::join!(
            self.load_admin_settings(),
            self.load_admin_logs(),
            self.load_admin_stats()
        );
    }

    pub async fn load_admin_settings(&self) {
        match self.api.admin_settings().await {
            Ok(settings) => {
                self.state.send_if_modified(|s| match s.session.panel_mut() {
                    Some(panel) => {
                        panel.settings = Some(settings);
                        true
                    }
                    None => false,
                });
            }
            Err(ApiError::Unauthorized) => self.expire_session(false).await,
            Err(e) => tracing::error!(error = %e, "failed to load admin settings"),
        }
    }

    pub async fn load_admin_logs(&self) {
        let logs = match self.api.admin_logs().await {
            Ok(entries) => LogsView::Loaded(entries),
            Err(ApiError::Unauthorized) => {
                self.expire_session(true).await;
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load admin logs");
                LogsView::Failed
            }
        };
        self.state.send_if_modified(|s| match s.session.panel_mut() {
            Some(panel) => {
                panel.logs = logs;
                true
            }
            None => false,
        });
    }

    pub async fn load_admin_stats(&self) {
        match self.api.admin_stats().await {
            Ok(stats) => {
                self.state.send_if_modified(|s| match s.session.panel_mut() {
                    Some(panel) => {
                        panel.stats = Some(stats);
                        true
                    }
                    None => false,
                });
            }
            Err(ApiError::Unauthorized) => self.expire_session(false).await,
            Err(e) => tracing::error!(error = %e, "failed to load admin stats"),
        }
    }

    /// Sets the room manager address that receives booking notifications.
    /// An empty address clears it.
    pub async fn save_room_manager_email(&self, email: &str) -> Outcome {
        if !self.is_admin() {
            return Outcome::NotOffered;
        }
        let email = email.trim();
        if !email.is_empty() && !email.contains('@') {
            self.dialogs
                .alert(
                    "Bitte geben Sie eine gültige E-Mail-Adresse ein.",
                    "Ungültige E-Mail",
                    Severity::Error,
                )
                .await;
            return Outcome::Invalid;
        }

        match self.api.update_room_manager_email(email).await {
            Ok(()) => {
                self.state.send_if_modified(|s| match s.session.panel_mut() {
                    Some(panel) => {
                        panel
                            .settings
                            .get_or_insert_with(AdminSettings::default)
                            .room_manager_email = Some(email.to_string());
                        true
                    }
                    None => false,
                });
                tracing::info!(email, "room manager email updated");
                self.dialogs
                    .alert(
                        "Die Saal-Verantwortlichen E-Mail wurde erfolgreich aktualisiert!",
                        "Erfolg",
                        Severity::Success,
                    )
                    .await;
                Outcome::Done
            }
            Err(ApiError::Unauthorized) => {
                self.expire_session(true).await;
                Outcome::SessionExpired
            }
            Err(ApiError::Domain(message)) => {
                self.show_domain_error(&message).await;
                Outcome::DomainError(message)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save room manager email");
                self.dialogs
                    .alert(
                        "Es gab einen Fehler beim Speichern der E-Mail.",
                        "Fehler",
                        Severity::Error,
                    )
                    .await;
                Outcome::Failed
            }
        }
    }
}
