//! Idempotency record of budget alerts that already fired.

use tracing::debug;

use crate::{
    domain::{BudgetAlert, ExpenseCategory, Period, Threshold, UserId},
    errors::Result,
};

use super::store::LedgerStore;

/// Remembers which (user, category, period, threshold) alerts were sent.
pub trait AlertLog: Send + Sync {
    fn has_fired(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: Period,
        threshold: Threshold,
    ) -> Result<bool>;

    /// Records the alert. Marking an already recorded tuple is a silent no-op.
    fn mark_fired(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: Period,
        threshold: Threshold,
    ) -> Result<()>;
}

impl AlertLog for LedgerStore {
    fn has_fired(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: Period,
        threshold: Threshold,
    ) -> Result<bool> {
        self.read(|tables| {
            tables
                .budget_alerts
                .iter()
                .any(|alert| alert.matches(user_id, category, period, threshold))
        })
    }

    fn mark_fired(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: Period,
        threshold: Threshold,
    ) -> Result<()> {
        let created_at = self.clock.now();
        self.commit(|tables| {
            if tables
                .budget_alerts
                .iter()
                .any(|alert| alert.matches(user_id, category, period, threshold))
            {
                debug!(user_id, %category, %period, %threshold, "alert already recorded");
                return Ok(((), false));
            }
            tables.budget_alerts.push(BudgetAlert {
                user_id,
                category,
                period,
                threshold,
                created_at,
            });
            Ok(((), true))
        })
    }
}
