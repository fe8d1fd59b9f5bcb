//! Ledger Store and Alert Log: the persisted tables and the only code that
//! touches them.

pub mod alerts;
pub mod query;
pub mod store;
pub mod tables;

pub use alerts::AlertLog;
pub use query::TransactionQuery;
pub use store::LedgerStore;
pub use tables::{LedgerTables, SCHEMA_VERSION};
