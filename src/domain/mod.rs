//! Typed data model shared by the store, services and dialogue layers.

pub mod amount;
pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;
pub mod window;

pub use amount::{
    checked_sum, format_amount, parse_amount, percent_of_total, validate_amount, AmountError,
};
pub use budget::{Budget, BudgetAlert, Threshold};
pub use category::{resolve_category, CategoryError, ExpenseCategory};
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionKind, DEFAULT_INCOME_SOURCE,
};
pub use user::{User, UserId, UserProfile};
pub use window::{DateWindow, Period, PeriodError};
