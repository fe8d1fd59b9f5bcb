//! Transport-facing surface: inbound events, routing, handlers and the
//! notification sink. A chat transport (or the console shell) feeds
//! [`InboundEvent`]s into a [`Dispatcher`] and renders what arrives at its
//! [`Notifier`].

pub mod context;
pub mod dispatcher;
pub mod event;
pub mod handlers;
pub mod menu;
pub mod messages;
pub mod notifier;
pub mod registry;

pub use context::{BotSettings, HandlerContext};
pub use dispatcher::Dispatcher;
pub use event::{EventKind, InboundEvent};
pub use menu::{ButtonAction, MenuAction};
pub use notifier::{Button, Keyboard, Notification, Notifier, RecordingNotifier};
pub use registry::{CommandEntry, CommandRegistry};

use thiserror::Error;

use crate::{core::services::ServiceError, errors::TrackerError};

pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("{0}")]
    Invalid(String),
}

impl From<ServiceError> for BotError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => BotError::Core(err),
            ServiceError::Invalid(message) => BotError::Invalid(message),
        }
    }
}
