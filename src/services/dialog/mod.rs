pub mod modal;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmOptions {
    /// Shows a free-text input with this label.
    pub input_label: Option<String>,
}

impl ConfirmOptions {
    pub fn with_input(label: impl Into<String>) -> Self {
        Self {
            input_label: Some(label.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    pub confirmed: bool,
    /// Trimmed input text; `None` when declined or when no input was shown.
    pub input_value: Option<String>,
}

impl ConfirmOutcome {
    pub fn declined() -> Self {
        Self {
            confirmed: false,
            input_value: None,
        }
    }
}

/// Confirm/alert dialogs. Each call resolves exactly once.
#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn confirm(&self, message: &str, title: &str, options: ConfirmOptions)
        -> ConfirmOutcome;

    async fn alert(&self, message: &str, title: &str, severity: Severity);
}
