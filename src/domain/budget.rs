use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{category::ExpenseCategory, user::UserId, window::Period};

/// Monthly spending limit for one category; one row per (user, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub user_id: UserId,
    pub category: ExpenseCategory,
    pub amount: Decimal,
}

/// Budget consumption boundary that fires at most one alert per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Threshold {
    #[serde(rename = "80")]
    Warning,
    #[serde(rename = "100")]
    Exhausted,
}

impl Threshold {
    /// Evaluation order.
    pub const ASCENDING: [Threshold; 2] = [Threshold::Warning, Threshold::Exhausted];

    pub fn ratio(self) -> Decimal {
        match self {
            Threshold::Warning => Decimal::new(8, 1),
            Threshold::Exhausted => Decimal::ONE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Threshold::Warning => "80",
            Threshold::Exhausted => "100",
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_str())
    }
}

/// Write-once marker recording that an alert already fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub user_id: UserId,
    pub category: ExpenseCategory,
    pub period: Period,
    pub threshold: Threshold,
    pub created_at: NaiveDateTime,
}

impl BudgetAlert {
    pub fn matches(
        &self,
        user_id: UserId,
        category: ExpenseCategory,
        period: Period,
        threshold: Threshold,
    ) -> bool {
        self.user_id == user_id
            && self.category == category
            && self.period == period
            && self.threshold == threshold
    }
}
