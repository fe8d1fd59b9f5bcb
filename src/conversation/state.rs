use rust_decimal::Decimal;

use crate::domain::ExpenseCategory;

/// Where a user is inside an entry flow. Each variant carries exactly the
/// values collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingExpenseAmount {
        category: ExpenseCategory,
    },
    AwaitingExpenseComment {
        category: ExpenseCategory,
        amount: Decimal,
    },
    AwaitingIncomeAmount,
    AwaitingIncomeSource {
        amount: Decimal,
    },
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }

    /// Short tag used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitingExpenseAmount { .. } => "awaiting_expense_amount",
            ConversationState::AwaitingExpenseComment { .. } => "awaiting_expense_comment",
            ConversationState::AwaitingIncomeAmount => "awaiting_income_amount",
            ConversationState::AwaitingIncomeSource { .. } => "awaiting_income_source",
        }
    }
}
