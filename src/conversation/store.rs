use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::{domain::UserId, errors::Result};

use super::ConversationState;

/// In-memory map from identity to its pending flow. Idle users have no
/// entry, so at most one flow exists per identity. Nothing here survives a
/// restart.
#[derive(Debug, Default)]
pub struct ConversationStore {
    states: Mutex<HashMap<UserId, ConversationState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: UserId) -> Result<ConversationState> {
        let states = self.states.lock()?;
        Ok(states.get(&user_id).cloned().unwrap_or_default())
    }

    pub fn set(&self, user_id: UserId, state: ConversationState) -> Result<()> {
        let mut states = self.states.lock()?;
        if state.is_idle() {
            states.remove(&user_id);
        } else {
            debug!(user_id, state = state.name(), "conversation state stored");
            states.insert(user_id, state);
        }
        Ok(())
    }

    /// Drops the pending flow. Returns whether one existed.
    pub fn discard(&self, user_id: UserId) -> Result<bool> {
        let removed = self.states.lock()?.remove(&user_id);
        if let Some(state) = &removed {
            debug!(user_id, state = state.name(), "pending flow discarded");
        }
        Ok(removed.is_some())
    }

    pub fn pending_count(&self) -> Result<usize> {
        Ok(self.states.lock()?.len())
    }
}

/// One lock per identity so two events from the same user never interleave,
/// while different users proceed in parallel.
#[derive(Debug, Default)]
pub struct IdentityLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(&self, user_id: UserId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock()?;
        Ok(locks.entry(user_id).or_default().clone())
    }
}
