use crate::models::{AdminLogEntry, AdminSettings, AdminStats};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LogsView {
    #[default]
    Loading,
    Loaded(Vec<AdminLogEntry>),
    Failed,
}

/// Admin-only data. Exists only inside [`SessionGate::Authenticated`], so a
/// demotion drops it together with the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminPanel {
    pub settings: Option<AdminSettings>,
    pub logs: LogsView,
    pub stats: Option<AdminStats>,
}

/// Whether this client holds an admin session on the server.
///
/// The server tracks the session through a cookie; this is the client's view
/// of it. Transitions: `promote` after a successful PIN check, `demote` on
/// logout or on any 401 from an admin endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionGate {
    #[default]
    Unauthenticated,
    Authenticated(AdminPanel),
}

impl SessionGate {
    pub fn is_admin(&self) -> bool {
        matches!(self, SessionGate::Authenticated(_))
    }

    /// Enters admin mode with an empty panel. Returns `false` if already there.
    pub fn promote(&mut self) -> bool {
        if self.is_admin() {
            return false;
        }
        *self = SessionGate::Authenticated(AdminPanel::default());
        true
    }

    /// Leaves admin mode. Returns `false` if already unauthenticated.
    pub fn demote(&mut self) -> bool {
        let was_admin = self.is_admin();
        *self = SessionGate::Unauthenticated;
        was_admin
    }

    pub fn panel(&self) -> Option<&AdminPanel> {
        match self {
            SessionGate::Authenticated(panel) => Some(panel),
            SessionGate::Unauthenticated => None,
        }
    }

    pub fn panel_mut(&mut self) -> Option<&mut AdminPanel> {
        match self {
            SessionGate::Authenticated(panel) => Some(panel),
            SessionGate::Unauthenticated => None,
        }
    }
}
