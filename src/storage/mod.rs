pub mod json_backend;

use std::path::Path;

use crate::{errors::Result, ledger::Ledger};

pub use json_backend::JsonStorage;

/// How a load attempt went. The recovered ledger is empty for both failure cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Missing,
    Malformed(String),
}

/// Result of loading a ledger document.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub outcome: LoadOutcome,
}

/// Abstraction over persistence backends holding one whole-ledger document.
pub trait StorageBackend {
    /// Never fails: missing or undecodable documents recover as an empty ledger.
    fn load(&self) -> LoadReport;
    fn save(&self, ledger: &Ledger) -> Result<()>;
    fn path(&self) -> &Path;
}
