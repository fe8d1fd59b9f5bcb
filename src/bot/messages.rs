//! User-facing texts. Everything here is pure formatting.

use rust_decimal::Decimal;

use crate::core::services::{
    render_bar, BudgetAlertEvent, BudgetProgress, CategoryShare, PeriodSummary, StatsRange,
};
use crate::domain::{
    format_amount, ExpenseCategory, Transaction, TransactionKind, DEFAULT_INCOME_SOURCE,
};

use super::registry::CommandRegistry;

pub const WELCOME: &str = "Добро пожаловать!\n\
Я помогу быстро записывать расходы и доходы, показывать статистику и следить за бюджетами.\n\n\
Выбирайте кнопки ниже или используйте команды из /help.";
pub const FALLBACK: &str = "Выберите действие через кнопки ниже или используйте /help.";
pub const GENERIC_FAILURE: &str = "Что-то пошло не так. Попробуйте ещё раз позже.";
pub const ADD_EXPENSE_INTRO: &str = "Добавление расхода\n\
1. Выберите категорию ниже.\n\
2. Введите сумму (например, 450).\n\
3. Добавьте комментарий при необходимости.";
pub const INCOME_INTRO: &str =
    "Добавление дохода\nВведите сумму (например, 2500), затем укажите источник дохода.";
pub const INVALID_AMOUNT_RETRY: &str = "Сумма должна быть положительным числом. Попробуйте снова:";
pub const COMMENT_PROMPT: &str = "Добавьте комментарий или нажмите кнопку, чтобы пропустить.";
pub const INCOME_SOURCE_PROMPT: &str = "Укажите источник дохода (например, стипендия):";
pub const SET_BUDGET_USAGE: &str =
    "Использование: /set_budget категория сумма\nНапример: /set_budget еда 5000";
pub const UNKNOWN_CATEGORY: &str = "Неизвестная категория. Используйте названия из /add.";
pub const INVALID_BUDGET_AMOUNT: &str = "Сумма должна быть положительным числом.";
pub const EXPORT_USAGE: &str = "Использование: /export YYYY-MM";
pub const EXPORT_BAD_PERIOD: &str = "Неверный формат. Используйте YYYY-MM, например 2025-01.";
pub const EXPORT_EMPTY: &str = "За выбранный месяц нет операций.";
pub const NO_BUDGETS: &str = "Бюджеты не заданы. Используйте /set_budget.";
pub const DELETED: &str = "Запись удалена ✅";
pub const DELETE_FAILED: &str = "Не удалось удалить.";
pub const INVALID_REQUEST: &str = "Некорректный запрос.";
pub const NO_PENDING_COMMENT: &str = "Нет ожидаемого комментария.";
pub const COMMENT_SKIPPED: &str = "Комментарий пропущен";
const NO_HISTORY: &str = "Записей пока нет.";
const FALLBACK_EMOJI: &str = "✨";
const INCOME_EMOJI: &str = "💰";
const HISTORY_TIME_FORMAT: &str = "%d.%m %H:%M";

pub fn money(amount: Decimal, symbol: &str) -> String {
    format!("{}{symbol}", format_amount(amount))
}

/// Emoji and title for a stored category key; unknown keys are shown
/// capitalized next to a neutral emoji.
pub fn category_label(key: &str) -> String {
    match ExpenseCategory::from_key(key) {
        Some(category) => category.label(),
        None => format!("{FALLBACK_EMOJI} {}", capitalize(key)),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn help(registry: &CommandRegistry) -> String {
    let mut lines = vec!["Основные команды".to_string()];
    lines.extend(
        registry
            .iter()
            .map(|entry| format!("{}: {}", entry.usage, entry.description)),
    );
    lines.join("\n")
}

pub fn unknown_command(name: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(best) => format!("Неизвестная команда /{name}. Возможно, вы имели в виду /{best}?"),
        None => format!("Неизвестная команда /{name}. Список команд: /help"),
    }
}

pub fn category_line(share: &CategoryShare, symbol: &str) -> String {
    format!(
        "{}: {} {} {:.0}%",
        category_label(&share.category),
        money(share.amount, symbol),
        render_bar(share.percent),
        share.percent
    )
}

pub fn period_summary(range: StatsRange, summary: Option<&PeriodSummary>, symbol: &str) -> String {
    let Some(summary) = summary else {
        return format!("Нет расходов за {}.", range.label());
    };
    let mut lines = vec![format!("Расходы за {}", range.label())];
    lines.extend(
        summary
            .shares
            .iter()
            .map(|share| category_line(share, symbol)),
    );
    if range.shows_totals() {
        lines.push(String::new());
        lines.push(format!("Итого: {}", money(summary.total, symbol)));
        lines.push(format!(
            "Средний расход в день: {}",
            money(summary.daily_average(), symbol)
        ));
    }
    lines.join("\n")
}

pub fn history(rows: &[Transaction], symbol: &str) -> String {
    let mut lines = vec!["Последние операции".to_string()];
    for txn in rows {
        let (label, sign) = match txn.kind {
            TransactionKind::Expense => (
                category_label(txn.category.as_deref().unwrap_or_default()),
                '-',
            ),
            TransactionKind::Income => (
                format!(
                    "{INCOME_EMOJI} {}",
                    txn.category.as_deref().unwrap_or(DEFAULT_INCOME_SOURCE)
                ),
                '+',
            ),
        };
        let mut line = format!(
            "{} • {label} • {sign}{}",
            txn.created_at.format(HISTORY_TIME_FORMAT),
            money(txn.amount, symbol)
        );
        if let Some(comment) = &txn.comment {
            line.push_str(" — ");
            line.push_str(comment);
        }
        lines.push(line);
    }
    if rows.is_empty() {
        lines.push(NO_HISTORY.to_string());
    }
    lines.join("\n")
}

pub fn goals(progress: &[BudgetProgress], symbol: &str) -> String {
    if progress.is_empty() {
        return NO_BUDGETS.to_string();
    }
    let mut lines = vec!["Прогресс по бюджетам".to_string()];
    lines.extend(progress.iter().map(|item| {
        format!(
            "{}: {}/{} ({:.0}%)",
            item.category.label(),
            format_amount(item.spent),
            money(item.budget, symbol),
            item.percent
        )
    }));
    lines.join("\n")
}

pub fn budget_alert(event: &BudgetAlertEvent, symbol: &str) -> String {
    format!(
        "⚠️ {}: израсходовано {} ({:.0}% от бюджета {})",
        event.category.label(),
        money(event.spent, symbol),
        event.percent,
        money(event.budget, symbol)
    )
}

pub fn budget_set(category: ExpenseCategory, amount: Decimal, symbol: &str) -> String {
    format!(
        "Бюджет для {} установлен на {}",
        category.label(),
        money(amount, symbol)
    )
}

pub fn expense_amount_prompt(category: ExpenseCategory) -> String {
    format!("Введите сумму для {}:", category.label())
}

pub fn expense_recorded(category: ExpenseCategory, amount: Decimal, symbol: &str) -> String {
    format!("Записано: {} {}", category.label(), money(amount, symbol))
}

pub fn income_recorded(source: &str, amount: Decimal, symbol: &str) -> String {
    format!("Доход {source} на сумму {} добавлен.", money(amount, symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Period, Threshold};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn summary_lines_carry_bar_and_rounded_percent() {
        let share = CategoryShare {
            category: "food".into(),
            amount: dec!(450),
            percent: 62.4,
        };
        assert_eq!(category_line(&share, "₽"), "🍔 Еда: 450.00₽ ████████████ 62%");
    }

    #[test]
    fn empty_summary_names_the_range() {
        assert_eq!(
            period_summary(StatsRange::Week, None, "₽"),
            "Нет расходов за неделю."
        );
    }

    #[test]
    fn unknown_category_keys_fall_back_to_capitalized_text() {
        assert_eq!(category_label("pets"), "✨ Pets");
        assert_eq!(category_label("transport"), "🚌 Транспорт");
    }

    #[test]
    fn history_marks_income_and_expense() {
        let at = NaiveDate::from_ymd_opt(2025, 5, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let rows = vec![
            Transaction {
                id: 2,
                user_id: 1,
                kind: TransactionKind::Income,
                category: Some("стипендия".into()),
                amount: dec!(3000),
                comment: None,
                created_at: at,
            },
            Transaction {
                id: 1,
                user_id: 1,
                kind: TransactionKind::Expense,
                category: Some("food".into()),
                amount: dec!(12.5),
                comment: Some("кофе".into()),
                created_at: at,
            },
        ];
        let text = history(&rows, "₽");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "09.05 14:05 • 💰 стипендия • +3000.00₽");
        assert_eq!(lines[2], "09.05 14:05 • 🍔 Еда • -12.50₽ — кофе");
        assert!(history(&[], "₽").ends_with(NO_HISTORY));
    }

    #[test]
    fn alert_text_reports_capped_percent() {
        let event = BudgetAlertEvent {
            user_id: 1,
            category: ExpenseCategory::Food,
            period: Period::new(2025, 5).unwrap(),
            threshold: Threshold::Exhausted,
            spent: dec!(1200),
            budget: dec!(1000),
            percent: 100.0,
        };
        assert_eq!(
            budget_alert(&event, "₽"),
            "⚠️ 🍔 Еда: израсходовано 1200.00₽ (100% от бюджета 1000.00₽)"
        );
    }
}
