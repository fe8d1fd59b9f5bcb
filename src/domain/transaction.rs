use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{category::ExpenseCategory, user::UserId};

pub type TransactionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted ledger row. Immutable once written; only deletion is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    /// Category key for expenses, free-text source for income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// The expense category this row belongs to, if it is a known one.
    pub fn expense_category(&self) -> Option<ExpenseCategory> {
        match self.kind {
            TransactionKind::Expense => self.category.as_deref().and_then(ExpenseCategory::from_key),
            TransactionKind::Income => None,
        }
    }
}

/// Source recorded for income entered without one.
pub const DEFAULT_INCOME_SOURCE: &str = "Доход";

/// Input for a ledger insert; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub amount: Decimal,
    pub comment: Option<String>,
}

impl NewTransaction {
    pub fn expense(category: ExpenseCategory, amount: Decimal, comment: Option<String>) -> Self {
        Self {
            kind: TransactionKind::Expense,
            category: Some(category.key().to_string()),
            amount,
            comment: comment.filter(|text| !text.is_empty()),
        }
    }

    pub fn income(source: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind: TransactionKind::Income,
            category: Some(source.into()),
            amount,
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_comment_is_dropped() {
        let txn = NewTransaction::expense(ExpenseCategory::Food, dec!(10), Some(String::new()));
        assert_eq!(txn.comment, None);
        assert_eq!(txn.category.as_deref(), Some("food"));
    }

    #[test]
    fn serializes_kind_in_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Income).unwrap();
        assert_eq!(json, "\"income\"");
    }
}
