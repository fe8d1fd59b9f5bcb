//! The fixed set of expense categories and free-text resolution against it.

use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expense classification. Income uses a free-text source instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Housing,
    Education,
    Health,
    Clothes,
    Communication,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`")]
pub struct CategoryError(pub String);

static ALIASES: Lazy<HashMap<String, ExpenseCategory>> = Lazy::new(|| {
    let mut aliases = HashMap::new();
    for category in ExpenseCategory::ALL {
        let title = category.title().to_lowercase();
        aliases.insert(category.key().to_string(), category);
        aliases.insert(category.emoji().to_string(), category);
        aliases.insert(normalize_letters(&title), category);
        aliases.insert(title, category);
    }
    aliases
});

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Housing,
        ExpenseCategory::Education,
        ExpenseCategory::Health,
        ExpenseCategory::Clothes,
        ExpenseCategory::Communication,
        ExpenseCategory::Other,
    ];

    /// Stable identifier used in storage and button payloads.
    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Clothes => "clothes",
            ExpenseCategory::Communication => "communication",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "🍔",
            ExpenseCategory::Transport => "🚌",
            ExpenseCategory::Entertainment => "🎮",
            ExpenseCategory::Housing => "🏠",
            ExpenseCategory::Education => "📚",
            ExpenseCategory::Health => "💊",
            ExpenseCategory::Clothes => "👕",
            ExpenseCategory::Communication => "📱",
            ExpenseCategory::Other => "✨",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Еда",
            ExpenseCategory::Transport => "Транспорт",
            ExpenseCategory::Entertainment => "Развлечения",
            ExpenseCategory::Housing => "Жильё",
            ExpenseCategory::Education => "Учёба",
            ExpenseCategory::Health => "Здоровье",
            ExpenseCategory::Clothes => "Одежда",
            ExpenseCategory::Communication => "Связь",
            ExpenseCategory::Other => "Другое",
        }
    }

    /// Emoji and title, e.g. `🍔 Еда`.
    pub fn label(self) -> String {
        format!("{} {}", self.emoji(), self.title())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves free text against category keys, emoji and display titles,
/// ignoring case and the `ё`/`е` spelling variant.
pub fn resolve_category(input: &str) -> Result<ExpenseCategory, CategoryError> {
    let lowered = input.trim().to_lowercase();
    ALIASES
        .get(&lowered)
        .or_else(|| ALIASES.get(&normalize_letters(&lowered)))
        .copied()
        .ok_or_else(|| CategoryError(input.trim().to_string()))
}

fn normalize_letters(value: &str) -> String {
    value.replace('ё', "е")
}
