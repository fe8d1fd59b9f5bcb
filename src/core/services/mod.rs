pub mod aggregator;
pub mod budget_service;
pub mod export_service;
pub mod summary_service;
pub mod transaction_service;

pub use aggregator::{aggregate_by_category, render_bar, CategoryShare, PeriodSummary};
pub use budget_service::{BudgetAlertEvent, BudgetProgress, BudgetService};
pub use export_service::{ExportFile, ExportService};
pub use summary_service::{StatsRange, SummaryService};
pub use transaction_service::{RecordedExpense, TransactionService};

use crate::{domain::AmountError, errors::TrackerError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("{0}")]
    Invalid(String),
}

impl From<AmountError> for ServiceError {
    /// Out-of-range input is a validation failure; an overflowing total means
    /// the stored data itself is unusable.
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::Overflow => ServiceError::Core(TrackerError::InvalidInput(err.to_string())),
            other => ServiceError::Invalid(other.to_string()),
        }
    }
}
