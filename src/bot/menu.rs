//! Main-menu labels and inline button payloads.

use thiserror::Error;

use crate::domain::{ExpenseCategory, TransactionId};

use super::notifier::{Button, Keyboard};

pub const ADD_EXPENSE_PREFIX: &str = "add_expense:";
pub const DELETE_TX_PREFIX: &str = "delete_tx:";
pub const SKIP_COMMENT: &str = "skip_comment";

const CATEGORY_COLUMNS: usize = 3;

/// Reply-keyboard entries. Pressing one abandons any pending flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Expense,
    Income,
    Today,
    Week,
    Month,
    History,
    Budgets,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::Expense,
        MenuAction::Income,
        MenuAction::Today,
        MenuAction::Week,
        MenuAction::Month,
        MenuAction::History,
        MenuAction::Budgets,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Expense => "➕ Расход",
            MenuAction::Income => "💰 Доход",
            MenuAction::Today => "📊 Сегодня",
            MenuAction::Week => "📈 Неделя",
            MenuAction::Month => "🗓️ Месяц",
            MenuAction::History => "📰 История",
            MenuAction::Budgets => "🎯 Бюджеты",
        }
    }

    /// Command run by the button; menu entries are shortcuts for commands.
    pub fn command(self) -> &'static str {
        match self {
            MenuAction::Expense => "add",
            MenuAction::Income => "income",
            MenuAction::Today => "today",
            MenuAction::Week => "week",
            MenuAction::Month => "month",
            MenuAction::History => "history",
            MenuAction::Budgets => "goals",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|action| action.label() == text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("malformed button payload `{0}`")]
    Malformed(String),
    #[error("unknown button payload `{0}`")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    AddExpense(ExpenseCategory),
    Delete(TransactionId),
    SkipComment,
}

impl ButtonAction {
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        if payload == SKIP_COMMENT {
            return Ok(ButtonAction::SkipComment);
        }
        if let Some(key) = payload.strip_prefix(ADD_EXPENSE_PREFIX) {
            return ExpenseCategory::from_key(key)
                .map(ButtonAction::AddExpense)
                .ok_or_else(|| PayloadError::Malformed(payload.to_string()));
        }
        if let Some(id) = payload.strip_prefix(DELETE_TX_PREFIX) {
            return id
                .trim()
                .parse()
                .map(ButtonAction::Delete)
                .map_err(|_| PayloadError::Malformed(payload.to_string()));
        }
        Err(PayloadError::Unknown(payload.to_string()))
    }

    pub fn payload(self) -> String {
        match self {
            ButtonAction::AddExpense(category) => format!("{ADD_EXPENSE_PREFIX}{}", category.key()),
            ButtonAction::Delete(id) => format!("{DELETE_TX_PREFIX}{id}"),
            ButtonAction::SkipComment => SKIP_COMMENT.to_string(),
        }
    }
}

/// Every expense category, three per row.
pub fn category_keyboard() -> Keyboard {
    let buttons: Vec<Button> = ExpenseCategory::ALL
        .into_iter()
        .map(|category| Button::new(category.label(), ButtonAction::AddExpense(category).payload()))
        .collect();
    Keyboard::Inline(
        buttons
            .chunks(CATEGORY_COLUMNS)
            .map(<[Button]>::to_vec)
            .collect(),
    )
}

pub fn skip_comment_keyboard() -> Keyboard {
    Keyboard::Inline(vec![vec![Button::new(
        "Пропустить 💨",
        ButtonAction::SkipComment.payload(),
    )]])
}

/// One delete button per row.
pub fn delete_keyboard(ids: &[TransactionId]) -> Keyboard {
    if ids.is_empty() {
        return Keyboard::None;
    }
    Keyboard::Inline(
        ids.iter()
            .map(|id| vec![Button::new(format!("Удалить {id}"), ButtonAction::Delete(*id).payload())])
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_parse_back() {
        assert_eq!(
            ButtonAction::parse("add_expense:health"),
            Ok(ButtonAction::AddExpense(ExpenseCategory::Health))
        );
        assert_eq!(ButtonAction::parse("delete_tx:17"), Ok(ButtonAction::Delete(17)));
        assert_eq!(ButtonAction::parse("skip_comment"), Ok(ButtonAction::SkipComment));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            ButtonAction::parse("delete_tx:abc"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            ButtonAction::parse("delete_tx:"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            ButtonAction::parse("add_expense:pets"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            ButtonAction::parse("refresh"),
            Err(PayloadError::Unknown(_))
        ));
    }

    #[test]
    fn menu_labels_resolve() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::from_label(action.label()), Some(action));
        }
        assert_eq!(MenuAction::from_label("Расход"), None);
    }

    #[test]
    fn category_keyboard_has_three_columns() {
        let Keyboard::Inline(rows) = category_keyboard() else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert_eq!(rows[0][0].payload, "add_expense:food");
    }
}
