//! Recording, listing and removing ledger entries.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::error;

use crate::domain::{
    validate_amount, ExpenseCategory, NewTransaction, Transaction, TransactionId, UserId,
    DEFAULT_INCOME_SOURCE,
};
use crate::ledger::LedgerStore;

use super::{budget_service::BudgetAlertEvent, BudgetService, ServiceError, ServiceResult};

/// Outcome of a stored expense together with any alerts it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedExpense {
    pub id: TransactionId,
    pub alerts: Vec<BudgetAlertEvent>,
}

pub struct TransactionService;

impl TransactionService {
    /// Stores the expense, then evaluates the category budget inline. Once the
    /// insert succeeds the call succeeds; budget check failures are logged.
    pub fn record_expense(
        store: &LedgerStore,
        user_id: UserId,
        category: ExpenseCategory,
        amount: Decimal,
        comment: Option<String>,
        now: NaiveDateTime,
    ) -> ServiceResult<RecordedExpense> {
        let amount = Self::ensure_valid(amount)?;
        let id = store.insert(user_id, NewTransaction::expense(category, amount, comment))?;
        // The row is committed at this point, so a failed check must not fail
        // the call. Unmarked thresholds are evaluated again on the next expense.
        let alerts = match BudgetService::check_thresholds(store, store, user_id, category, now) {
            Ok(alerts) => alerts,
            Err(err) => {
                error!(
                    user_id,
                    transaction_id = id,
                    %category,
                    error = %err,
                    "budget check failed after expense was stored"
                );
                Vec::new()
            }
        };
        Ok(RecordedExpense { id, alerts })
    }

    /// Stores income. Income never touches budgets.
    pub fn record_income(
        store: &LedgerStore,
        user_id: UserId,
        source: &str,
        amount: Decimal,
    ) -> ServiceResult<TransactionId> {
        let amount = Self::ensure_valid(amount)?;
        let source = match source.trim() {
            "" => DEFAULT_INCOME_SOURCE,
            trimmed => trimmed,
        };
        Ok(store.insert(user_id, NewTransaction::income(source, amount))?)
    }

    /// `false` when the id is unknown or belongs to someone else.
    pub fn remove(
        store: &LedgerStore,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> ServiceResult<bool> {
        Ok(store.delete(user_id, transaction_id)?)
    }

    pub fn history(
        store: &LedgerStore,
        user_id: UserId,
        limit: usize,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(store.recent(user_id, limit)?)
    }

    fn ensure_valid(amount: Decimal) -> ServiceResult<Decimal> {
        validate_amount(amount).map_err(|err| ServiceError::Invalid(format!("Invalid amount: {err}")))
    }
}
