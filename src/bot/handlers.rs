//! Command, button and dialogue handlers.

use tracing::{debug, warn};

use crate::{
    conversation::{transition, Effect, Event},
    core::services::{
        BudgetService, ExportService, StatsRange, SummaryService, TransactionService,
    },
    domain::{parse_amount, resolve_category, Period, TransactionId},
};

use super::{
    context::HandlerContext,
    menu::{self, ButtonAction, PayloadError},
    messages,
    notifier::Notification,
    registry::{CommandEntry, CommandRegistry},
    BotResult,
};

pub fn default_registry() -> CommandRegistry {
    CommandRegistry::new(vec![
        CommandEntry::new("start", "приветствие", "/start", cmd_start),
        CommandEntry::new("help", "список команд", "/help", cmd_help),
        CommandEntry::new(
            "add",
            "добавить расход через клавиатуру категорий",
            "/add",
            cmd_add,
        ),
        CommandEntry::new("income", "записать доход", "/income", cmd_income),
        CommandEntry::new("today", "статистика за сегодня", "/today", cmd_today),
        CommandEntry::new("week", "статистика за последние 7 дней", "/week", cmd_week),
        CommandEntry::new("month", "статистика за текущий месяц", "/month", cmd_month),
        CommandEntry::new(
            "history",
            "последние операции и удаление",
            "/history",
            cmd_history,
        ),
        CommandEntry::new(
            "set_budget",
            "установить лимит (/set_budget еда 5000)",
            "/set_budget категория сумма",
            cmd_set_budget,
        ),
        CommandEntry::new("goals", "прогресс по лимитам", "/goals", cmd_goals),
        CommandEntry::new(
            "export",
            "выгрузка CSV за месяц",
            "/export YYYY-MM",
            cmd_export,
        ),
    ])
}

fn cmd_start(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    ctx.reply(messages::WELCOME)
}

fn cmd_help(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    ctx.reply(messages::help(ctx.registry))
}

/// Shows the category keyboard; the flow itself starts on a category press.
fn cmd_add(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    ctx.reply_with(messages::ADD_EXPENSE_INTRO, menu::category_keyboard())
}

fn cmd_income(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    advance(ctx, Event::StartIncome)
}

fn cmd_today(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    show_stats(ctx, StatsRange::Today)
}

fn cmd_week(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    show_stats(ctx, StatsRange::Week)
}

fn cmd_month(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    show_stats(ctx, StatsRange::Month)
}

fn show_stats(ctx: &HandlerContext<'_>, range: StatsRange) -> BotResult<()> {
    let summary = SummaryService::summarize_range(ctx.store, ctx.user_id, range, ctx.now())?;
    ctx.reply(messages::period_summary(
        range,
        summary.as_ref(),
        &ctx.settings.currency_symbol,
    ))
}

fn cmd_history(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    let rows = TransactionService::history(ctx.store, ctx.user_id, ctx.settings.history_limit)?;
    let ids: Vec<TransactionId> = rows.iter().map(|txn| txn.id).collect();
    ctx.reply_with(
        messages::history(&rows, &ctx.settings.currency_symbol),
        menu::delete_keyboard(&ids),
    )
}

fn cmd_set_budget(ctx: &HandlerContext<'_>, args: &str) -> BotResult<()> {
    let Some((name, amount)) = args.trim().split_once(char::is_whitespace) else {
        return ctx.reply(messages::SET_BUDGET_USAGE);
    };
    let category = match resolve_category(name) {
        Ok(category) => category,
        Err(err) => {
            debug!(user_id = ctx.user_id, error = %err, "set_budget rejected");
            return ctx.reply(messages::UNKNOWN_CATEGORY);
        }
    };
    let amount = match parse_amount(amount) {
        Ok(amount) => amount,
        Err(err) => {
            debug!(user_id = ctx.user_id, error = %err, "set_budget rejected");
            return ctx.reply(messages::INVALID_BUDGET_AMOUNT);
        }
    };
    BudgetService::set_budget(ctx.store, ctx.user_id, category, amount)?;
    ctx.reply(messages::budget_set(
        category,
        amount,
        &ctx.settings.currency_symbol,
    ))
}

fn cmd_goals(ctx: &HandlerContext<'_>, _args: &str) -> BotResult<()> {
    let progress = BudgetService::progress(ctx.store, ctx.user_id, ctx.now())?;
    ctx.reply(messages::goals(&progress, &ctx.settings.currency_symbol))
}

fn cmd_export(ctx: &HandlerContext<'_>, args: &str) -> BotResult<()> {
    let args = args.trim();
    if args.is_empty() {
        return ctx.reply(messages::EXPORT_USAGE);
    }
    let period: Period = match args.parse() {
        Ok(period) => period,
        Err(err) => {
            debug!(user_id = ctx.user_id, error = %err, "export rejected");
            return ctx.reply(messages::EXPORT_BAD_PERIOD);
        }
    };
    match ExportService::export_month(ctx.store, ctx.user_id, period)? {
        Some(file) => ctx.send(Notification::Document {
            file_name: file.file_name,
            content: file.content,
        }),
        None => ctx.reply(messages::EXPORT_EMPTY),
    }
}

pub fn handle_button(ctx: &HandlerContext<'_>, payload: &str) -> BotResult<()> {
    let action = match ButtonAction::parse(payload) {
        Ok(action) => action,
        Err(PayloadError::Malformed(_)) => return ctx.notice(messages::INVALID_REQUEST, true),
        Err(err @ PayloadError::Unknown(_)) => {
            warn!(user_id = ctx.user_id, error = %err, "ignoring button press");
            return Ok(());
        }
    };
    match action {
        ButtonAction::AddExpense(category) => {
            ctx.notice(format!("Категория: {}", category.title()), false)?;
            advance(ctx, Event::StartExpense { category })
        }
        ButtonAction::Delete(id) => delete_transaction(ctx, id),
        ButtonAction::SkipComment => advance(ctx, Event::SkipComment),
    }
}

fn delete_transaction(ctx: &HandlerContext<'_>, id: TransactionId) -> BotResult<()> {
    if !TransactionService::remove(ctx.store, ctx.user_id, id)? {
        return ctx.notice(messages::DELETE_FAILED, true);
    }
    ctx.notice(messages::DELETED, false)?;
    cmd_history(ctx, "")
}

pub fn handle_text(ctx: &HandlerContext<'_>, text: &str) -> BotResult<()> {
    advance(ctx, Event::Text(text.to_string()))
}

/// Runs one conversation step. Ledger writes happen first; the new state is
/// stored only when they all succeeded, so a failed write leaves the flow
/// where it was. Replies go out last.
fn advance(ctx: &HandlerContext<'_>, event: Event) -> BotResult<()> {
    let state = ctx.conversations.get(ctx.user_id)?;
    let result = transition(&state, event);
    debug!(
        user_id = ctx.user_id,
        from = state.name(),
        to = result.new_state.name(),
        "conversation transition"
    );
    let mut outbox = Vec::new();
    for effect in result.effects {
        outbox.extend(execute(ctx, effect)?);
    }
    ctx.conversations.set(ctx.user_id, result.new_state)?;
    for notification in outbox {
        ctx.send(notification)?;
    }
    Ok(())
}

fn execute(ctx: &HandlerContext<'_>, effect: Effect) -> BotResult<Vec<Notification>> {
    let symbol = &ctx.settings.currency_symbol;
    let notifications = match effect {
        Effect::PromptExpenseAmount { category } => {
            vec![Notification::message(messages::expense_amount_prompt(category))]
        }
        Effect::PromptComment => vec![Notification::Message {
            text: messages::COMMENT_PROMPT.into(),
            keyboard: menu::skip_comment_keyboard(),
        }],
        Effect::PromptIncomeAmount => vec![Notification::with_menu(messages::INCOME_INTRO)],
        Effect::PromptIncomeSource => vec![Notification::message(messages::INCOME_SOURCE_PROMPT)],
        Effect::RejectAmount(err) => {
            debug!(user_id = ctx.user_id, error = %err, "amount rejected");
            vec![Notification::message(messages::INVALID_AMOUNT_RETRY)]
        }
        Effect::RecordExpense {
            category,
            amount,
            comment,
        } => {
            let recorded = TransactionService::record_expense(
                ctx.store,
                ctx.user_id,
                category,
                amount,
                comment,
                ctx.now(),
            )?;
            let mut notifications = vec![Notification::with_menu(messages::expense_recorded(
                category, amount, symbol,
            ))];
            notifications.extend(
                recorded
                    .alerts
                    .iter()
                    .map(|alert| Notification::BudgetAlert(messages::budget_alert(alert, symbol))),
            );
            notifications
        }
        Effect::RecordIncome { source, amount } => {
            TransactionService::record_income(ctx.store, ctx.user_id, &source, amount)?;
            vec![Notification::with_menu(messages::income_recorded(
                &source, amount, symbol,
            ))]
        }
        Effect::CommentSkipped => vec![Notification::Notice {
            text: messages::COMMENT_SKIPPED.into(),
            alert: false,
        }],
        Effect::NothingPending => vec![Notification::Notice {
            text: messages::NO_PENDING_COMMENT.into(),
            alert: true,
        }],
        Effect::Unhandled => vec![Notification::with_menu(messages::FALLBACK)],
    };
    Ok(notifications)
}
