//! Budget limits and the threshold alerting that guards them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{
    checked_sum, percent_of_total, validate_amount, AmountError, DateWindow, ExpenseCategory,
    Period, Threshold, UserId,
};
use crate::ledger::{AlertLog, LedgerStore, TransactionQuery};

use super::{ServiceError, ServiceResult};

/// A threshold crossing that has just been recorded and must be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAlertEvent {
    pub user_id: UserId,
    pub category: ExpenseCategory,
    pub period: Period,
    pub threshold: Threshold,
    pub spent: Decimal,
    pub budget: Decimal,
    /// Share of the budget consumed, capped at 100.
    pub percent: f64,
}

/// Month-to-date consumption of one configured budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub category: ExpenseCategory,
    pub budget: Decimal,
    pub spent: Decimal,
    pub percent: f64,
}

pub struct BudgetService;

impl BudgetService {
    pub fn set_budget(
        store: &LedgerStore,
        user_id: UserId,
        category: ExpenseCategory,
        amount: Decimal,
    ) -> ServiceResult<()> {
        let amount = validate_amount(amount)
            .map_err(|err| ServiceError::Invalid(format!("Budget is invalid: {err}")))?;
        store.upsert_budget(user_id, category, amount)?;
        Ok(())
    }

    /// Expense total for one category inside `window`.
    pub fn category_spend(
        store: &LedgerStore,
        user_id: UserId,
        category: ExpenseCategory,
        window: DateWindow,
    ) -> ServiceResult<Decimal> {
        let rows = store.query(user_id, &TransactionQuery::all().within(window).expenses())?;
        Ok(checked_sum(
            rows.iter()
                .filter(|txn| txn.expense_category() == Some(category))
                .map(|txn| txn.amount),
        )?)
    }

    /// Runs after an expense in `category` was stored.
    ///
    /// Each threshold is checked in ascending order against month-to-date
    /// spend; a crossing that the alert log has not seen yet is marked first
    /// and only then returned, so a tuple is never delivered twice. Both
    /// thresholds can come back from a single call.
    pub fn check_thresholds(
        store: &LedgerStore,
        alerts: &dyn AlertLog,
        user_id: UserId,
        category: ExpenseCategory,
        now: NaiveDateTime,
    ) -> ServiceResult<Vec<BudgetAlertEvent>> {
        let budget = match store.get_budget(user_id, category)? {
            Some(budget) if budget > Decimal::ZERO => budget,
            _ => {
                debug!(user_id, %category, "no budget configured; skipping threshold check");
                return Ok(Vec::new());
            }
        };
        let period = Period::containing(now);
        let spent = Self::category_spend(store, user_id, category, period.window())?;
        if spent <= Decimal::ZERO {
            return Ok(Vec::new());
        }

        let mut fired = Vec::new();
        for threshold in Threshold::ASCENDING {
            let limit = budget
                .checked_mul(threshold.ratio())
                .ok_or(AmountError::Overflow)?;
            if spent < limit {
                continue;
            }
            if alerts.has_fired(user_id, category, period, threshold)? {
                continue;
            }
            alerts.mark_fired(user_id, category, period, threshold)?;
            info!(
                user_id,
                %category,
                %period,
                %threshold,
                spent = %spent,
                budget = %budget,
                "budget alert fired"
            );
            fired.push(BudgetAlertEvent {
                user_id,
                category,
                period,
                threshold,
                spent,
                budget,
                percent: percent_of_total(spent, budget).min(100.0),
            });
        }
        Ok(fired)
    }

    /// Every configured budget with its consumption in the month of `now`.
    pub fn progress(
        store: &LedgerStore,
        user_id: UserId,
        now: NaiveDateTime,
    ) -> ServiceResult<Vec<BudgetProgress>> {
        let window = DateWindow::month(now);
        store
            .list_budgets(user_id)?
            .into_iter()
            .map(|budget| {
                let spent = Self::category_spend(store, user_id, budget.category, window)?;
                Ok(BudgetProgress {
                    category: budget.category,
                    budget: budget.amount,
                    spent,
                    percent: percent_of_total(spent, budget.amount).min(100.0),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Clock, FixedClock};
    use crate::domain::{NewTransaction, UserProfile};
    use crate::errors::TrackerError;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn setup() -> (Arc<FixedClock>, LedgerStore) {
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 4, 12)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
        ));
        let store = LedgerStore::in_memory(clock.clone()).unwrap();
        store.ensure_user(&UserProfile::new(1)).unwrap();
        (clock, store)
    }

    fn spend(store: &LedgerStore, category: ExpenseCategory, amount: Decimal) {
        store
            .insert(1, NewTransaction::expense(category, amount, None))
            .unwrap();
    }

    fn check(store: &LedgerStore, clock: &FixedClock) -> Vec<BudgetAlertEvent> {
        BudgetService::check_thresholds(store, store, 1, ExpenseCategory::Food, clock.now())
            .unwrap()
    }

    #[test]
    fn no_budget_means_no_alerts() {
        let (clock, store) = setup();
        spend(&store, ExpenseCategory::Food, dec!(450));
        assert!(check(&store, &clock).is_empty());
    }

    #[test]
    fn warning_fires_once_below_the_full_budget() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(1000)).unwrap();
        spend(&store, ExpenseCategory::Food, dec!(850));

        let fired = check(&store, &clock);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].threshold, Threshold::Warning);
        assert_eq!(fired[0].spent, dec!(850));
        assert!((fired[0].percent - 85.0).abs() < f64::EPSILON);

        assert!(check(&store, &clock).is_empty());
    }

    #[test]
    fn one_large_expense_fires_both_thresholds_in_order() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(500)).unwrap();
        spend(&store, ExpenseCategory::Food, dec!(900));

        let fired = check(&store, &clock);
        let thresholds: Vec<_> = fired.iter().map(|event| event.threshold).collect();
        assert_eq!(thresholds, vec![Threshold::Warning, Threshold::Exhausted]);
        assert!((fired[1].percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn other_categories_do_not_count_towards_the_budget() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(100)).unwrap();
        spend(&store, ExpenseCategory::Transport, dec!(500));
        assert!(check(&store, &clock).is_empty());
    }

    #[test]
    fn a_new_month_starts_a_fresh_period() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(100)).unwrap();
        spend(&store, ExpenseCategory::Food, dec!(120));
        assert_eq!(check(&store, &clock).len(), 2);

        clock.advance(Duration::days(30));
        spend(&store, ExpenseCategory::Food, dec!(85));
        let fired = check(&store, &clock);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].period.to_string(), "2025-05");
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let (_, store) = setup();
        let err = BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(0))
            .expect_err("zero budget must be rejected");
        assert!(matches!(err, ServiceError::Invalid(_)));

        let err = BudgetService::set_budget(&store, 1, ExpenseCategory::Food, Decimal::MAX)
            .expect_err("oversized budget must be rejected");
        assert!(matches!(err, ServiceError::Invalid(_)));
        assert_eq!(store.get_budget(1, ExpenseCategory::Food).unwrap(), None);
    }

    #[test]
    fn overflowing_spend_is_an_error_not_a_panic() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(100)).unwrap();
        spend(&store, ExpenseCategory::Food, Decimal::MAX);
        spend(&store, ExpenseCategory::Food, Decimal::MAX);

        let err = BudgetService::check_thresholds(
            &store,
            &store,
            1,
            ExpenseCategory::Food,
            clock.now(),
        )
        .expect_err("sum does not fit");
        assert!(matches!(err, ServiceError::Core(TrackerError::InvalidInput(_))));
        assert!(BudgetService::progress(&store, 1, clock.now()).is_err());
    }

    #[test]
    fn progress_caps_percent_at_one_hundred() {
        let (clock, store) = setup();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Food, dec!(200)).unwrap();
        BudgetService::set_budget(&store, 1, ExpenseCategory::Health, dec!(1000)).unwrap();
        spend(&store, ExpenseCategory::Food, dec!(300));

        let progress = BudgetService::progress(&store, 1, clock.now()).unwrap();
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].spent, dec!(300));
        assert!((progress[0].percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(progress[1].spent, Decimal::ZERO);
        assert_eq!(progress[1].percent, 0.0);
    }
}
