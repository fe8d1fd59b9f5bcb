pub mod json_backend;
pub mod memory;

use crate::{errors::Result, ledger::LedgerTables};

/// Abstraction over persistence backends capable of storing the ledger tables.
pub trait TableStorage: Send + Sync {
    /// Loads the last saved snapshot, or empty tables when nothing was saved yet.
    fn load(&self) -> Result<LedgerTables>;

    /// Durably replaces the saved snapshot.
    fn save(&self, tables: &LedgerTables) -> Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;
