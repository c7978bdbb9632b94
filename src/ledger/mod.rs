//! Ledger data model: categories owning ordered transaction sequences.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use ledger::{Ledger, TransactionRow};
pub use transaction::{
    ensure_finite, parse_amount, validate_date, Amount, Transaction, DATE_FORMAT,
};
