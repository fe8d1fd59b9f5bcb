use chrono::NaiveDateTime;

use crate::domain::{DateWindow, UserId};
use crate::ledger::{LedgerStore, TransactionQuery};

use super::{aggregator::PeriodSummary, ServiceResult};

/// Reporting ranges offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Today,
    /// Last seven calendar days including today.
    Week,
    Month,
}

impl StatsRange {
    pub fn window(self, now: NaiveDateTime) -> DateWindow {
        match self {
            StatsRange::Today => DateWindow::day(now),
            StatsRange::Week => DateWindow::trailing_days(now, 7),
            StatsRange::Month => DateWindow::month(now),
        }
    }

    /// Accusative phrase completing "Расходы за ...".
    pub fn label(self) -> &'static str {
        match self {
            StatsRange::Today => "сегодня",
            StatsRange::Week => "неделю",
            StatsRange::Month => "месяц",
        }
    }

    /// Only the month report carries total and per-day average lines.
    pub fn shows_totals(self) -> bool {
        matches!(self, StatsRange::Month)
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Expense breakdown for `window`; `None` when nothing was spent.
    pub fn summarize_window(
        store: &LedgerStore,
        user_id: UserId,
        window: DateWindow,
    ) -> ServiceResult<Option<PeriodSummary>> {
        let rows = store.query(user_id, &TransactionQuery::all().within(window).expenses())?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(PeriodSummary::from_transactions(window, &rows)?))
    }

    pub fn summarize_range(
        store: &LedgerStore,
        user_id: UserId,
        range: StatsRange,
        now: NaiveDateTime,
    ) -> ServiceResult<Option<PeriodSummary>> {
        Self::summarize_window(store, user_id, range.window(now))
    }
}
