use chrono::NaiveDateTime;

use crate::domain::{DateWindow, Transaction, TransactionKind};

/// Filter for ledger reads. Absent bounds are open on that side; an absent
/// kind matches both expenses and income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub since: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.since = Some(window.start);
        self.until = Some(window.end);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn expenses(self) -> Self {
        self.kind(TransactionKind::Expense)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self.since.map_or(true, |since| txn.created_at >= since)
            && self.until.map_or(true, |until| txn.created_at <= until)
    }
}
