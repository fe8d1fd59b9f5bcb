#![doc(test(attr(deny(warnings))))]

//! Finance Tracker records expenses and income through a short per-user
//! dialogue, keeps them in a durable ledger, and derives period summaries
//! and budget-threshold alerts.

pub mod bot;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing; `directive` replaces the default filter.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("Finance tracker tracing initialized.");
    });
}
