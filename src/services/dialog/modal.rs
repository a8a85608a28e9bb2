//! A single shared modal driven by a front end.
//!
//! [`ModalDialogs`] is handed to the controller; [`ModalHost`] stays with the
//! front end, which watches the shown view and presses buttons. Calls queue
//! for the one modal. Each call attaches a fresh responder and the responder
//! is detached before the call returns, on every path, including the calling
//! future being dropped.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use super::{ConfirmOptions, ConfirmOutcome, Dialogs, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    Confirm {
        title: String,
        message: String,
        input_label: Option<String>,
    },
    Alert {
        title: String,
        message: String,
        severity: Severity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Press {
    /// Confirm button, carrying whatever was typed into the input field.
    Yes(String),
    No,
    Ok,
}

impl Press {
    fn fits(&self, view: &ModalView) -> bool {
        matches!(
            (self, view),
            (Press::Yes(_) | Press::No, ModalView::Confirm { .. })
                | (Press::Ok, ModalView::Alert { .. })
        )
    }
}

struct Responder {
    view: ModalView,
    reply: oneshot::Sender<Press>,
}

struct Slot {
    turn: tokio::sync::Mutex<()>,
    responder: Mutex<Option<Responder>>,
    shown: watch::Sender<Option<ModalView>>,
}

impl Slot {
    fn attach(&self, view: ModalView) -> oneshot::Receiver<Press> {
        let (reply, rx) = oneshot::channel();
        *self.responder.lock().unwrap() = Some(Responder {
            view: view.clone(),
            reply,
        });
        self.shown.send_replace(Some(view));
        rx
    }

    fn detach(&self) {
        self.responder.lock().unwrap().take();
        self.shown.send_replace(None);
    }
}

/// Clears the modal when a call ends, however it ends.
struct Attached<'a>(&'a Slot);

impl Drop for Attached<'_> {
    fn drop(&mut self) {
        self.0.detach();
    }
}

pub struct ModalDialogs {
    slot: Arc<Slot>,
}

#[derive(Clone)]
pub struct ModalHost {
    slot: Arc<Slot>,
}

impl ModalDialogs {
    pub fn new() -> (Self, ModalHost) {
        let (shown, _) = watch::channel(None);
        let slot = Arc::new(Slot {
            turn: tokio::sync::Mutex::new(()),
            responder: Mutex::new(None),
            shown,
        });
        (
            Self {
                slot: Arc::clone(&slot),
            },
            ModalHost { slot },
        )
    }

    async fn show(&self, view: ModalView) -> Option<Press> {
        let _turn = self.slot.turn.lock().await;
        let rx = self.slot.attach(view);
        let _attached = Attached(&self.slot);
        rx.await.ok()
    }
}

#[async_trait]
impl Dialogs for ModalDialogs {
    async fn confirm(
        &self,
        message: &str,
        title: &str,
        options: ConfirmOptions,
    ) -> ConfirmOutcome {
        let shows_input = options.input_label.is_some();
        let view = ModalView::Confirm {
            title: title.to_string(),
            message: message.to_string(),
            input_label: options.input_label,
        };
        match self.show(view).await {
            Some(Press::Yes(input)) => ConfirmOutcome {
                confirmed: true,
                input_value: shows_input.then(|| input.trim().to_string()),
            },
            _ => ConfirmOutcome::declined(),
        }
    }

    async fn alert(&self, message: &str, title: &str, severity: Severity) {
        let view = ModalView::Alert {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        };
        self.show(view).await;
    }
}

impl ModalHost {
    pub fn subscribe(&self) -> watch::Receiver<Option<ModalView>> {
        self.slot.shown.subscribe()
    }

    pub fn current(&self) -> Option<ModalView> {
        self.slot
            .responder
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.view.clone())
    }

    pub fn is_attached(&self) -> bool {
        self.slot.responder.lock().unwrap().is_some()
    }

    /// Resolves the shown modal. Returns `false` when nothing is shown or the
    /// shown modal has no such button; the modal then stays open.
    pub fn press(&self, press: Press) -> bool {
        let responder = {
            let mut guard = self.slot.responder.lock().unwrap();
            match guard.as_ref() {
                Some(r) if press.fits(&r.view) => guard.take(),
                _ => None,
            }
        };
        match responder {
            Some(r) => r.reply.send(press).is_ok(),
            None => false,
        }
    }
}
