use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Error type that captures ledger, persistence, and query failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("File `{}` not found", .0.display())]
    NotFound(PathBuf),
    #[error("File `{}` is malformed: {reason}", .path.display())]
    MalformedFile { path: PathBuf, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid {target} index")]
    Index { target: IndexTarget, position: usize },
    #[error("Invalid data: {0}")]
    SortData(String),
    #[error("Import failed on line {line}: {reason}")]
    Import { line: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    pub(crate) fn index(target: IndexTarget, position: usize) -> Self {
        LedgerError::Index { target, position }
    }
}

/// Rejected user input. Recovered by re-prompting or by refusing the single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{0}` is not a valid amount")]
    InvalidAmount(String),
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
    #[error("`{0}` is not a date in the format YYYY-MM-DD")]
    InvalidDate(String),
    #[error("`{0}` is not a field choice (expected c, a or d)")]
    InvalidFieldChoice(String),
    #[error("Category name cannot be empty")]
    EmptyCategory,
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
}

/// Which of the two positional indices failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    Category,
    Transaction,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexTarget::Category => f.write_str("category"),
            IndexTarget::Transaction => f.write_str("transaction"),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
