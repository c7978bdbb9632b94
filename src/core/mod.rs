pub mod import;
pub mod services;
pub mod transaction_store;

pub use transaction_store::{TransactionStore, TransactionUpdate, UpdateField};
