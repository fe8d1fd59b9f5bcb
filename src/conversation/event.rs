use crate::domain::ExpenseCategory;

/// Inputs that can move a flow forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Category picked on the expense keyboard.
    StartExpense { category: ExpenseCategory },
    StartIncome,
    /// Free text typed while a flow may be pending.
    Text(String),
    /// The "skip" button under the comment prompt.
    SkipComment,
}
