//! Pure aggregation over transaction slices. No I/O happens here.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{
    amount::round_amount, checked_sum, percent_of_total, AmountError, DateWindow,
    ExpenseCategory, Transaction,
};

const BAR_BLOCK: char = '█';
const PERCENT_PER_BLOCK: f64 = 5.0;
const MAX_BLOCKS: usize = 20;

/// Sums amounts per category key. Rows without a category land in `other`.
pub fn aggregate_by_category(
    transactions: &[Transaction],
) -> Result<BTreeMap<String, Decimal>, AmountError> {
    let mut totals = BTreeMap::new();
    for txn in transactions {
        let key = txn
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(ExpenseCategory::Other.key());
        let slot = totals.entry(key.to_string()).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(txn.amount)
            .ok_or(AmountError::Overflow)?;
    }
    Ok(totals)
}

/// One block per 5%, at least one for any positive share, at most twenty.
pub fn render_bar(percent: f64) -> String {
    if percent <= 0.0 {
        return String::new();
    }
    let blocks = ((percent / PERCENT_PER_BLOCK).floor() as usize).clamp(1, MAX_BLOCKS);
    std::iter::repeat(BAR_BLOCK).take(blocks).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: f64,
}

impl CategoryShare {
    pub fn expense_category(&self) -> Option<ExpenseCategory> {
        ExpenseCategory::from_key(&self.category)
    }
}

/// Category breakdown of a window, largest share first.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub window: DateWindow,
    pub shares: Vec<CategoryShare>,
    pub total: Decimal,
}

impl PeriodSummary {
    pub fn from_transactions(
        window: DateWindow,
        transactions: &[Transaction],
    ) -> Result<Self, AmountError> {
        let totals = aggregate_by_category(transactions)?;
        let total = checked_sum(totals.values().copied())?;
        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                percent: percent_of_total(amount, total),
                category,
                amount,
            })
            .collect();
        shares.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        Ok(Self {
            window,
            shares,
            total,
        })
    }

    /// Spend per calendar day of the window, both bounds included.
    pub fn daily_average(&self) -> Decimal {
        round_amount(self.total / Decimal::from(self.window.days_inclusive()))
    }
}
