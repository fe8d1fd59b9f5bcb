use chrono::NaiveDateTime;
use tracing::info;

use crate::{
    config::Config,
    conversation::ConversationStore,
    core::Clock,
    domain::UserId,
    ledger::LedgerStore,
    utils::clip_for_log,
};

use super::{
    notifier::{Keyboard, Notification, Notifier},
    registry::CommandRegistry,
    BotResult,
};

/// Presentation settings taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub history_limit: usize,
    pub currency_symbol: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for BotSettings {
    fn from(config: &Config) -> Self {
        Self {
            history_limit: config.history_limit,
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

/// Everything a handler may touch while serving one event for one user.
pub struct HandlerContext<'a> {
    pub user_id: UserId,
    pub store: &'a LedgerStore,
    pub conversations: &'a ConversationStore,
    pub registry: &'a CommandRegistry,
    pub settings: &'a BotSettings,
    pub(super) clock: &'a dyn Clock,
    pub(super) notifier: &'a dyn Notifier,
}

impl HandlerContext<'_> {
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn send(&self, notification: Notification) -> BotResult<()> {
        info!(
            user_id = self.user_id,
            kind = notification.kind(),
            text = %clip_for_log(notification.text()),
            "-> notify"
        );
        self.notifier.notify(self.user_id, notification)?;
        Ok(())
    }

    /// Plain reply that also restores the main menu.
    pub fn reply(&self, text: impl Into<String>) -> BotResult<()> {
        self.send(Notification::with_menu(text))
    }

    pub fn reply_with(&self, text: impl Into<String>, keyboard: Keyboard) -> BotResult<()> {
        self.send(Notification::Message {
            text: text.into(),
            keyboard,
        })
    }

    pub fn notice(&self, text: impl Into<String>, alert: bool) -> BotResult<()> {
        self.send(Notification::Notice {
            text: text.into(),
            alert,
        })
    }
}
