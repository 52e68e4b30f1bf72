//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use campanel_core::{Command, Intent, LoadError, MutationOutcome, Tab, TabData, Ticket, View};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A command held back until the user answers y/n.
#[derive(Debug, Clone)]
pub struct ConfirmAction(pub Command);

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Command::Reboot => write!(f, "Reboot the device?"),
            Command::Shutdown => write!(f, "Shut down the device? It will stay off."),
            other => write!(f, "{}?", other.describe()),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Tabs ──────────────────────────────────────────────────────
    SwitchTab(Tab),
    Refresh,
    Loaded(Ticket, Box<Result<TabData, LoadError>>),

    // ── Content ───────────────────────────────────────────────────
    /// A fresh view tree for the active tab's screen.
    ViewChanged(Arc<View>),
    /// A control was activated.
    Invoke(Intent),
    /// Close the revealed password field.
    HidePassword,
    MutationDone(Ticket, Box<MutationOutcome>),

    // ── Confirmation dialog ───────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
