use crate::domain::{parse_amount, DEFAULT_INCOME_SOURCE};

use super::{ConversationState, Effect, Event};

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function: no I/O, same inputs give the same output.
pub fn transition(state: &ConversationState, event: Event) -> TransitionResult {
    match (state, event) {
        // Starting a flow replaces whatever was pending.
        (_, Event::StartExpense { category }) => {
            TransitionResult::new(ConversationState::AwaitingExpenseAmount { category })
                .with_effect(Effect::PromptExpenseAmount { category })
        }
        (_, Event::StartIncome) => TransitionResult::new(ConversationState::AwaitingIncomeAmount)
            .with_effect(Effect::PromptIncomeAmount),

        (ConversationState::Idle, Event::Text(_)) => {
            TransitionResult::new(ConversationState::Idle).with_effect(Effect::Unhandled)
        }

        (ConversationState::AwaitingExpenseAmount { category }, Event::Text(text)) => {
            match parse_amount(&text) {
                Ok(amount) => TransitionResult::new(ConversationState::AwaitingExpenseComment {
                    category: *category,
                    amount,
                })
                .with_effect(Effect::PromptComment),
                Err(err) => TransitionResult::new(state.clone())
                    .with_effect(Effect::RejectAmount(err)),
            }
        }

        (ConversationState::AwaitingExpenseComment { category, amount }, Event::Text(text)) => {
            let comment = Some(text.trim().to_string()).filter(|comment| !comment.is_empty());
            TransitionResult::new(ConversationState::Idle).with_effect(Effect::RecordExpense {
                category: *category,
                amount: *amount,
                comment,
            })
        }
        (ConversationState::AwaitingExpenseComment { category, amount }, Event::SkipComment) => {
            TransitionResult::new(ConversationState::Idle)
                .with_effect(Effect::RecordExpense {
                    category: *category,
                    amount: *amount,
                    comment: None,
                })
                .with_effect(Effect::CommentSkipped)
        }

        (ConversationState::AwaitingIncomeAmount, Event::Text(text)) => match parse_amount(&text) {
            Ok(amount) => TransitionResult::new(ConversationState::AwaitingIncomeSource { amount })
                .with_effect(Effect::PromptIncomeSource),
            Err(err) => {
                TransitionResult::new(state.clone()).with_effect(Effect::RejectAmount(err))
            }
        },

        (ConversationState::AwaitingIncomeSource { amount }, Event::Text(text)) => {
            let source = match text.trim() {
                "" => DEFAULT_INCOME_SOURCE,
                named => named,
            };
            TransitionResult::new(ConversationState::Idle).with_effect(Effect::RecordIncome {
                source: source.to_string(),
                amount: *amount,
            })
        }

        (_, Event::SkipComment) => {
            TransitionResult::new(state.clone()).with_effect(Effect::NothingPending)
        }
    }
}
