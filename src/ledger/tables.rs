use serde::{Deserialize, Serialize};

use crate::domain::{Budget, BudgetAlert, Transaction, TransactionId, User};

pub const SCHEMA_VERSION: u32 = 1;

/// Everything the ledger persists, saved and loaded as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerTables {
    pub schema_version: u32,
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub budget_alerts: Vec<BudgetAlert>,
    /// Next id to hand out; never decreases, so deleted ids are not reused.
    pub next_transaction_id: TransactionId,
}

impl Default for LedgerTables {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            users: Vec::new(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            budget_alerts: Vec::new(),
            next_transaction_id: 1,
        }
    }
}
