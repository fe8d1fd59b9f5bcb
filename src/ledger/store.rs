//! Durable, lock-guarded ledger: users, transactions and budgets.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    core::Clock,
    domain::{
        Budget, ExpenseCategory, NewTransaction, Transaction, TransactionId, User, UserId,
        UserProfile,
    },
    errors::{Result, TrackerError},
    storage::{JsonFileStorage, MemoryStorage, TableStorage},
};

use super::{query::TransactionQuery, tables::LedgerTables};

/// Shared ledger handle. Every public operation takes the single table lock,
/// so concurrent callers never observe a half-applied change.
pub struct LedgerStore {
    backend: Arc<dyn TableStorage>,
    tables: Mutex<LedgerTables>,
    pub(super) clock: Arc<dyn Clock>,
}

impl LedgerStore {
    pub fn open(backend: Arc<dyn TableStorage>, clock: Arc<dyn Clock>) -> Result<Self> {
        let tables = backend.load()?;
        info!(
            location = %backend.describe(),
            transactions = tables.transactions.len(),
            users = tables.users.len(),
            "ledger opened"
        );
        Ok(Self {
            backend,
            tables: Mutex::new(tables),
            clock,
        })
    }

    pub fn open_path(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::open(Arc::new(JsonFileStorage::new(path)?), clock)
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        Self::open(Arc::new(MemoryStorage::new()), clock)
    }

    pub(super) fn read<R>(&self, op: impl FnOnce(&LedgerTables) -> R) -> Result<R> {
        let tables = self.tables.lock()?;
        Ok(op(&tables))
    }

    /// Applies `op` and persists the result. `op` returns its value plus
    /// whether it changed anything; unchanged tables are not rewritten. When
    /// the save fails the tables are rolled back before the error is returned.
    pub(super) fn commit<R>(
        &self,
        op: impl FnOnce(&mut LedgerTables) -> Result<(R, bool)>,
    ) -> Result<R> {
        let mut tables = self.tables.lock()?;
        let snapshot = tables.clone();
        let (value, changed) = op(&mut tables)?;
        if changed {
            if let Err(err) = self.backend.save(&tables) {
                warn!(error = %err, "ledger save failed; rolling back");
                *tables = snapshot;
                return Err(err);
            }
        }
        Ok(value)
    }

    /// Registers a user on first contact and refreshes display metadata after.
    pub fn ensure_user(&self, profile: &UserProfile) -> Result<()> {
        let now = self.clock.now();
        self.commit(|tables| {
            match tables.users.iter_mut().find(|user| user.id() == profile.id) {
                Some(existing) if existing.profile == *profile => Ok(((), false)),
                Some(existing) => {
                    existing.profile = profile.clone();
                    Ok(((), true))
                }
                None => {
                    debug!(user_id = profile.id, "registering new user");
                    tables.users.push(User {
                        profile: profile.clone(),
                        created_at: now,
                    });
                    Ok(((), true))
                }
            }
        })
    }

    pub fn user(&self, user_id: UserId) -> Result<Option<User>> {
        self.read(|tables| tables.users.iter().find(|user| user.id() == user_id).cloned())
    }

    /// Appends a transaction with a fresh id and the current timestamp.
    pub fn insert(&self, user_id: UserId, new: NewTransaction) -> Result<TransactionId> {
        let created_at = self.clock.now();
        let id = self.commit(|tables| {
            if !tables.users.iter().any(|user| user.id() == user_id) {
                return Err(TrackerError::Storage(format!(
                    "transaction references unknown user {user_id}"
                )));
            }
            let id = tables.next_transaction_id;
            tables.next_transaction_id += 1;
            tables.transactions.push(Transaction {
                id,
                user_id,
                kind: new.kind,
                category: new.category,
                amount: new.amount,
                comment: new.comment,
                created_at,
            });
            Ok((id, true))
        })?;
        info!(user_id, transaction_id = id, "transaction recorded");
        Ok(id)
    }

    /// Removes the transaction only when it belongs to `user_id`.
    pub fn delete(&self, user_id: UserId, transaction_id: TransactionId) -> Result<bool> {
        let removed = self.commit(|tables| {
            let position = tables
                .transactions
                .iter()
                .position(|txn| txn.id == transaction_id && txn.user_id == user_id);
            match position {
                Some(index) => {
                    tables.transactions.remove(index);
                    Ok((true, true))
                }
                None => Ok((false, false)),
            }
        })?;
        if removed {
            info!(user_id, transaction_id, "transaction deleted");
        } else {
            debug!(user_id, transaction_id, "nothing to delete");
        }
        Ok(removed)
    }

    /// Newest first; rows sharing a timestamp come back newest-inserted first.
    pub fn query(&self, user_id: UserId, filter: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.read(|tables| {
            let mut rows: Vec<Transaction> = tables
                .transactions
                .iter()
                .filter(|txn| txn.user_id == user_id && filter.matches(txn))
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            if let Some(limit) = filter.limit {
                rows.truncate(limit);
            }
            rows
        })
    }

    pub fn recent(&self, user_id: UserId, limit: usize) -> Result<Vec<Transaction>> {
        self.query(user_id, &TransactionQuery::all().limit(limit))
    }

    /// Sets the category budget, replacing any earlier amount.
    pub fn upsert_budget(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        amount: Decimal,
    ) -> Result<()> {
        self.commit(|tables| {
            match tables
                .budgets
                .iter_mut()
                .find(|budget| budget.user_id == user_id && budget.category == category)
            {
                Some(existing) => existing.amount = amount,
                None => tables.budgets.push(Budget {
                    user_id,
                    category,
                    amount,
                }),
            }
            Ok(((), true))
        })?;
        info!(user_id, category = %category, amount = %amount, "budget set");
        Ok(())
    }

    pub fn get_budget(&self, user_id: UserId, category: ExpenseCategory) -> Result<Option<Decimal>> {
        self.read(|tables| {
            tables
                .budgets
                .iter()
                .find(|budget| budget.user_id == user_id && budget.category == category)
                .map(|budget| budget.amount)
        })
    }

    /// Budgets in the order they were first set.
    pub fn list_budgets(&self, user_id: UserId) -> Result<Vec<Budget>> {
        self.read(|tables| {
            tables
                .budgets
                .iter()
                .filter(|budget| budget.user_id == user_id)
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::FixedClock, domain::TransactionKind};
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ))
    }

    fn store_with_user(clock: Arc<FixedClock>) -> LedgerStore {
        let store = LedgerStore::in_memory(clock).unwrap();
        store.ensure_user(&UserProfile::new(1)).unwrap();
        store
    }

    #[test]
    fn ensure_user_updates_instead_of_replacing() {
        let clock = clock();
        let store = LedgerStore::in_memory(clock.clone()).unwrap();
        store.ensure_user(&UserProfile::new(7)).unwrap();
        let created = store.user(7).unwrap().unwrap().created_at;

        clock.advance(Duration::days(1));
        store
            .ensure_user(&UserProfile::new(7).with_username("alice"))
            .unwrap();

        let user = store.user(7).unwrap().unwrap();
        assert_eq!(user.profile.username.as_deref(), Some("alice"));
        assert_eq!(user.created_at, created);
    }

    #[test]
    fn insert_for_unknown_user_is_rejected() {
        let store = LedgerStore::in_memory(clock()).unwrap();
        let err = store
            .insert(99, NewTransaction::income("salary", dec!(10)))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
    }

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let store = store_with_user(clock());
        let first = store
            .insert(1, NewTransaction::expense(ExpenseCategory::Food, dec!(5), None))
            .unwrap();
        let second = store
            .insert(1, NewTransaction::expense(ExpenseCategory::Food, dec!(6), None))
            .unwrap();
        assert!(store.delete(1, second).unwrap());
        let third = store
            .insert(1, NewTransaction::expense(ExpenseCategory::Food, dec!(7), None))
            .unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn query_filters_by_kind_and_bounds() {
        let clock = clock();
        let store = store_with_user(clock.clone());
        store
            .insert(1, NewTransaction::income("salary", dec!(1000)))
            .unwrap();
        clock.advance(Duration::hours(1));
        let checkpoint = clock.now();
        store
            .insert(1, NewTransaction::expense(ExpenseCategory::Food, dec!(20), None))
            .unwrap();

        let expenses = store
            .query(1, &TransactionQuery::all().expenses())
            .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].kind, TransactionKind::Expense);

        let mut since = TransactionQuery::all();
        since.since = Some(checkpoint);
        assert_eq!(store.query(1, &since).unwrap().len(), 1);

        let mut until = TransactionQuery::all();
        until.until = Some(checkpoint - Duration::seconds(1));
        let rows = store.query(1, &until).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionKind::Income);
    }

    #[test]
    fn failed_save_rolls_back_the_change() {
        let backend = Arc::new(MemoryStorage::new());
        let store = LedgerStore::open(backend.clone(), clock()).unwrap();
        store.ensure_user(&UserProfile::new(1)).unwrap();

        backend.set_fail_writes(true);
        let result = store.insert(1, NewTransaction::income("gift", dec!(50)));
        assert!(matches!(result, Err(TrackerError::Storage(_))));
        assert!(store.recent(1, 10).unwrap().is_empty());

        backend.set_fail_writes(false);
        let id = store
            .insert(1, NewTransaction::income("gift", dec!(50)))
            .unwrap();
        assert_eq!(id, 1, "rolled-back insert must not consume an id");
    }

    #[test]
    fn upsert_budget_keeps_one_row_per_category() {
        let store = store_with_user(clock());
        store
            .upsert_budget(1, ExpenseCategory::Food, dec!(5000))
            .unwrap();
        store
            .upsert_budget(1, ExpenseCategory::Transport, dec!(1500))
            .unwrap();
        store
            .upsert_budget(1, ExpenseCategory::Food, dec!(6000))
            .unwrap();

        let budgets = store.list_budgets(1).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].category, ExpenseCategory::Food);
        assert_eq!(
            store.get_budget(1, ExpenseCategory::Food).unwrap(),
            Some(dec!(6000))
        );
        assert_eq!(store.get_budget(2, ExpenseCategory::Food).unwrap(), None);
    }
}
