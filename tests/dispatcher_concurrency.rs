mod common;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use common::at;
use finance_tracker::{
    bot::{BotSettings, Dispatcher, InboundEvent, Notification, Notifier},
    core::FixedClock,
    domain::{UserId, UserProfile},
    errors::Result,
    ledger::LedgerStore,
    storage::MemoryStorage,
};

fn dispatcher_with(notifier: Arc<dyn Notifier>) -> Arc<Dispatcher> {
    let clock = Arc::new(FixedClock::new(at(2025, 3, 14, 19, 45)));
    let store = Arc::new(
        LedgerStore::open(Arc::new(MemoryStorage::new()), clock.clone()).expect("open ledger"),
    );
    Arc::new(Dispatcher::new(
        store,
        notifier,
        clock,
        BotSettings::default(),
    ))
}

fn start(user_id: UserId) -> InboundEvent {
    InboundEvent::from_message(UserProfile::new(user_id), "/start")
}

/// Counts how many sends are in flight per user at once.
#[derive(Default)]
struct OverlapNotifier {
    active: Mutex<HashMap<UserId, usize>>,
    peak: Mutex<HashMap<UserId, usize>>,
    sent: AtomicUsize,
}

impl Notifier for OverlapNotifier {
    fn notify(&self, user_id: UserId, _notification: Notification) -> Result<()> {
        {
            let mut active = self.active.lock().expect("active lock");
            let current = active.entry(user_id).or_default();
            *current += 1;
            let mut peak = self.peak.lock().expect("peak lock");
            let seen = peak.entry(user_id).or_default();
            *seen = (*seen).max(*current);
        }
        thread::sleep(Duration::from_millis(2));
        *self
            .active
            .lock()
            .expect("active lock")
            .get_mut(&user_id)
            .expect("entry exists") -= 1;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn events_for_one_user_never_overlap() {
    let notifier = Arc::new(OverlapNotifier::default());
    let dispatcher = dispatcher_with(notifier.clone());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    dispatcher.handle(start(1)).expect("handle /start");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker finished");
    }

    assert_eq!(notifier.sent.load(Ordering::SeqCst), 40);
    assert_eq!(notifier.peak.lock().unwrap()[&1], 1);
}

/// Holds user 1's sends until the test releases them.
struct GateNotifier {
    entered: Mutex<Sender<UserId>>,
    gate: Mutex<Receiver<()>>,
}

impl Notifier for GateNotifier {
    fn notify(&self, user_id: UserId, _notification: Notification) -> Result<()> {
        self.entered.lock().unwrap().send(user_id).ok();
        if user_id == 1 {
            let _ = self
                .gate
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5));
        }
        Ok(())
    }
}

#[test]
fn a_busy_user_does_not_block_others() {
    let (entered_tx, entered) = mpsc::channel();
    let (release, gate_rx) = mpsc::channel();
    let dispatcher = dispatcher_with(Arc::new(GateNotifier {
        entered: Mutex::new(entered_tx),
        gate: Mutex::new(gate_rx),
    }));

    let first = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.handle(start(1)))
    };
    assert_eq!(entered.recv_timeout(Duration::from_secs(5)), Ok(1));

    // User 1 is parked inside a send; user 2 goes straight through.
    dispatcher.handle(start(2)).unwrap();
    assert_eq!(entered.recv_timeout(Duration::from_secs(5)), Ok(2));

    let second = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.handle(start(1)))
    };
    assert_eq!(
        entered.recv_timeout(Duration::from_millis(200)),
        Err(RecvTimeoutError::Timeout)
    );

    release.send(()).unwrap();
    release.send(()).unwrap();
    assert_eq!(entered.recv_timeout(Duration::from_secs(5)), Ok(1));
    first.join().unwrap().unwrap();
    second.join().unwrap().unwrap();
}
