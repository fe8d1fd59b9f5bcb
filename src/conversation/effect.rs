use rust_decimal::Decimal;

use crate::domain::{AmountError, ExpenseCategory};

/// Work the caller performs after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PromptExpenseAmount { category: ExpenseCategory },
    PromptComment,
    PromptIncomeAmount,
    PromptIncomeSource,
    /// The typed amount was unusable; the state did not move.
    RejectAmount(AmountError),
    RecordExpense {
        category: ExpenseCategory,
        amount: Decimal,
        comment: Option<String>,
    },
    RecordIncome { source: String, amount: Decimal },
    /// Follows the expense record when the comment was skipped.
    CommentSkipped,
    /// Skip pressed without a comment prompt open.
    NothingPending,
    /// Text arrived with no flow in progress.
    Unhandled,
}
