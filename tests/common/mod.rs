#![allow(dead_code)]

use std::path::{Path, PathBuf};

use expense_ledger::{core::TransactionStore, storage::JsonStorage};
use tempfile::TempDir;

pub const SCENARIO_JSON: &str = r#"{"Food":[{"amount":10,"date":"2024-01-05"},{"amount":5,"date":"2024-02-01"}]}"#;

pub fn data_path(temp: &TempDir) -> PathBuf {
    temp.path().join("transactions.json")
}

/// Opens a store over `path`, ignoring how the load went.
pub fn open_store(path: &Path) -> TransactionStore {
    TransactionStore::open(Box::new(JsonStorage::new(path))).0
}

/// A store over a fresh temporary directory. Keep the guard alive for the test.
pub fn temp_store() -> (TransactionStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = open_store(&data_path(&temp));
    (store, temp)
}

pub fn seeded_store() -> (TransactionStore, TempDir) {
    let (mut store, temp) = temp_store();
    store.add("Food", 10.0, "2024-01-05").expect("add");
    store.add("Food", 5.0, "2024-02-01").expect("add");
    store.add("Rent", 900.0, "2024-01-01").expect("add");
    store.add("Travel", 120.0, "2024-03-10").expect("add");
    (store, temp)
}
