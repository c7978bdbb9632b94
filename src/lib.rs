#![doc(test(attr(deny(warnings))))]

//! Expense Ledger keeps personal expenses grouped by category in a single JSON
//! document, with search, sorting, summaries and an interactive front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log. `RUST_LOG` overrides
/// `default_level`.
pub fn init(default_level: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(default_level);
        tracing::info!("Expense ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init("warn");
        super::init("debug");
    }
}
