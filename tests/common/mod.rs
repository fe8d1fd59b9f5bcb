#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{NaiveDate, NaiveDateTime};
use finance_tracker::{
    bot::{BotResult, BotSettings, Dispatcher, InboundEvent, Notification, RecordingNotifier},
    core::FixedClock,
    domain::{UserId, UserProfile},
    ledger::LedgerStore,
    storage::TableStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// A dispatcher wired to a recording notifier and a settable clock.
pub struct TestBot {
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<LedgerStore>,
    pub dispatcher: Dispatcher,
    pub db_path: Option<PathBuf>,
}

/// Bot backed by a JSON ledger in a fresh temp directory.
pub fn setup_bot(now: NaiveDateTime) -> TestBot {
    setup_bot_at(temp_base().join("finance_tracker.json"), now)
}

/// Bot over an existing (or new) JSON ledger file; used to simulate restarts.
pub fn setup_bot_at(db_path: PathBuf, now: NaiveDateTime) -> TestBot {
    let clock = Arc::new(FixedClock::new(now));
    let store = Arc::new(LedgerStore::open_path(&db_path, clock.clone()).expect("open ledger"));
    build(clock, store, Some(db_path))
}

/// Bot over an arbitrary storage backend.
pub fn setup_bot_with(backend: Arc<dyn TableStorage>, now: NaiveDateTime) -> TestBot {
    let clock = Arc::new(FixedClock::new(now));
    let store = Arc::new(LedgerStore::open(backend, clock.clone()).expect("open ledger"));
    build(clock, store, None)
}

fn build(clock: Arc<FixedClock>, store: Arc<LedgerStore>, db_path: Option<PathBuf>) -> TestBot {
    let notifier = Arc::new(RecordingNotifier::new());
    let dispatcher = Dispatcher::new(
        store.clone(),
        notifier.clone(),
        clock.clone(),
        BotSettings::default(),
    );
    TestBot {
        clock,
        notifier,
        store,
        dispatcher,
        db_path,
    }
}

impl TestBot {
    /// Sends what a user would type: commands, menu labels or plain text.
    pub fn send(&self, user_id: UserId, text: &str) -> BotResult<()> {
        self.dispatcher
            .handle(InboundEvent::from_message(UserProfile::new(user_id), text))
    }

    pub fn press(&self, user_id: UserId, payload: &str) -> BotResult<()> {
        self.dispatcher
            .handle(InboundEvent::button(UserProfile::new(user_id), payload))
    }

    /// Every notification since the last drain.
    pub fn drain(&self) -> Vec<(UserId, Notification)> {
        self.notifier.take()
    }

    pub fn drain_texts(&self) -> Vec<String> {
        self.drain()
            .into_iter()
            .map(|(_, notification)| notification.text().to_string())
            .collect()
    }

    pub fn budget_alerts(&self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|(_, notification)| match notification {
                Notification::BudgetAlert(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Runs the whole expense dialogue for `user_id`.
    pub fn add_expense(&self, user_id: UserId, category: &str, amount: &str, comment: Option<&str>) {
        self.press(user_id, &format!("add_expense:{category}"))
            .expect("choose category");
        self.send(user_id, amount).expect("enter amount");
        match comment {
            Some(comment) => self.send(user_id, comment).expect("enter comment"),
            None => self.press(user_id, "skip_comment").expect("skip comment"),
        }
    }
}
