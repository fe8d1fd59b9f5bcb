//! Per-identity dialogue for multi-step expense and income entry.
//!
//! `transition` is pure: it maps the current state and one inbound event to
//! the next state plus a list of effects. The bot layer performs the effects
//! and only then stores the new state.

mod effect;
mod event;
mod state;
mod store;
mod transition;

pub use effect::Effect;
pub use event::Event;
pub use state::ConversationState;
pub use store::{ConversationStore, IdentityLocks};
pub use transition::{transition, TransitionResult};
