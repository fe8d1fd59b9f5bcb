//! Outbound side of the transport contract.

use std::sync::Mutex;

use crate::{domain::UserId, errors::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Controls attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Keyboard {
    #[default]
    None,
    /// Persistent reply keyboard with the main menu labels.
    MainMenu,
    /// Inline buttons, laid out in rows.
    Inline(Vec<Vec<Button>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message { text: String, keyboard: Keyboard },
    /// Short acknowledgement of a button press; `alert` asks for a modal.
    Notice { text: String, alert: bool },
    BudgetAlert(String),
    Document { file_name: String, content: Vec<u8> },
}

impl Notification {
    pub fn message(text: impl Into<String>) -> Self {
        Notification::Message {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_menu(text: impl Into<String>) -> Self {
        Notification::Message {
            text: text.into(),
            keyboard: Keyboard::MainMenu,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Message { .. } => "message",
            Notification::Notice { .. } => "notice",
            Notification::BudgetAlert(_) => "budget_alert",
            Notification::Document { .. } => "document",
        }
    }

    /// Human-readable body; documents report their file name.
    pub fn text(&self) -> &str {
        match self {
            Notification::Message { text, .. } | Notification::Notice { text, .. } => text,
            Notification::BudgetAlert(text) => text,
            Notification::Document { file_name, .. } => file_name,
        }
    }
}

/// Delivery sink implemented by the transport.
pub trait Notifier: Send + Sync {
    fn notify(&self, user_id: UserId, notification: Notification) -> Result<()>;
}

/// Keeps every notification in memory; used by tests and scripted runs.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(UserId, Notification)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<(UserId, Notification)> {
        self.sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .unwrap_or_default()
    }

    pub fn texts_for(&self, user_id: UserId) -> Vec<String> {
        self.sent
            .lock()
            .map(|sent| {
                sent.iter()
                    .filter(|(recipient, _)| *recipient == user_id)
                    .map(|(_, notification)| notification.text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, user_id: UserId, notification: Notification) -> Result<()> {
        self.sent.lock()?.push((user_id, notification));
        Ok(())
    }
}
