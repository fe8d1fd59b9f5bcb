use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use crate::{
    errors::{Result, TrackerError},
    ledger::LedgerTables,
};

use super::TableStorage;

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<LedgerTables>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following save fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl TableStorage for MemoryStorage {
    fn load(&self) -> Result<LedgerTables> {
        Ok(self.snapshot.lock()?.clone().unwrap_or_default())
    }

    fn save(&self, tables: &LedgerTables) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackerError::Storage("simulated write failure".into()));
        }
        *self.snapshot.lock()? = Some(tables.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".into()
    }
}
