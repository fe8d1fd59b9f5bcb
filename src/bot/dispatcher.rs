use std::sync::{Arc, PoisonError};

use tracing::{error, info, warn};

use crate::{
    conversation::{ConversationStore, IdentityLocks},
    core::Clock,
    ledger::LedgerStore,
    utils::clip_for_log,
};

use super::{
    context::{BotSettings, HandlerContext},
    event::{EventKind, InboundEvent},
    handlers,
    menu::MenuAction,
    messages,
    notifier::{Notification, Notifier},
    registry::CommandRegistry,
    BotError, BotResult,
};

/// Routes inbound events to handlers.
///
/// Safe to share between transport threads: events for different users run
/// in parallel, events for the same user are handled one at a time.
pub struct Dispatcher {
    store: Arc<LedgerStore>,
    conversations: ConversationStore,
    locks: IdentityLocks,
    registry: CommandRegistry,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: BotSettings,
}

impl Dispatcher {
    pub fn new(
        store: Arc<LedgerStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: BotSettings,
    ) -> Self {
        Self {
            store,
            conversations: ConversationStore::new(),
            locks: IdentityLocks::new(),
            registry: handlers::default_registry(),
            notifier,
            clock,
            settings,
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handles one event end to end.
    ///
    /// Validation problems are answered with a corrective message and are
    /// not errors. Storage faults are logged, answered with a generic failure
    /// message and returned to the transport.
    pub fn handle(&self, event: InboundEvent) -> BotResult<()> {
        let user_id = event.user_id();
        info!(
            user_id,
            payload = %clip_for_log(&event.kind.payload()),
            "<- {}",
            event.kind.tag()
        );

        let lock = self.locks.for_user(user_id)?;
        // The lock guards no data; a handler that panicked leaves nothing to repair.
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let ctx = HandlerContext {
            user_id,
            store: &self.store,
            conversations: &self.conversations,
            registry: &self.registry,
            settings: &self.settings,
            clock: self.clock.as_ref(),
            notifier: self.notifier.as_ref(),
        };

        match self.route(&ctx, &event) {
            Ok(()) => Ok(()),
            Err(BotError::Invalid(message)) => {
                warn!(user_id, %message, "request rejected");
                ctx.reply(message)
            }
            Err(err) => {
                error!(user_id, error = %err, "event handling failed");
                if let Err(notify_err) = self
                    .notifier
                    .notify(user_id, Notification::with_menu(messages::GENERIC_FAILURE))
                {
                    warn!(user_id, error = %notify_err, "failure notice not delivered");
                }
                Err(err)
            }
        }
    }

    fn route(&self, ctx: &HandlerContext<'_>, event: &InboundEvent) -> BotResult<()> {
        self.store.ensure_user(&event.profile)?;
        match &event.kind {
            EventKind::Command { name, args } => match self.registry.get(name) {
                Some(entry) => {
                    self.conversations.discard(ctx.user_id)?;
                    (entry.handler)(ctx, args)
                }
                None => ctx.reply(messages::unknown_command(name, self.registry.suggest(name))),
            },
            EventKind::FreeText(text) => match MenuAction::from_label(text) {
                Some(action) => {
                    self.conversations.discard(ctx.user_id)?;
                    self.run_command(ctx, action.command())
                }
                None => handlers::handle_text(ctx, text),
            },
            EventKind::ButtonPress(payload) => handlers::handle_button(ctx, payload),
        }
    }

    fn run_command(&self, ctx: &HandlerContext<'_>, name: &str) -> BotResult<()> {
        match self.registry.get(name) {
            Some(entry) => (entry.handler)(ctx, ""),
            None => Err(BotError::Invalid(messages::unknown_command(name, None))),
        }
    }
}
