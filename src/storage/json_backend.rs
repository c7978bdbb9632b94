use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    errors::{LedgerError, Result},
    ledger::Ledger,
    utils::paths::ensure_dir,
};

use super::{LoadOutcome, LoadReport, StorageBackend};

const TMP_SUFFIX: &str = "tmp";
const INDENT: &[u8] = b"    ";

/// Stores the whole ledger as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> LoadReport {
        match load_ledger_from_path(&self.path) {
            Ok(ledger) => {
                info!(
                    path = %self.path.display(),
                    categories = ledger.category_count(),
                    "ledger loaded"
                );
                LoadReport {
                    ledger,
                    outcome: LoadOutcome::Loaded,
                }
            }
            Err(LedgerError::NotFound(path)) => {
                info!(path = %path.display(), "no ledger file yet, starting empty");
                LoadReport {
                    ledger: Ledger::new(),
                    outcome: LoadOutcome::Missing,
                }
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ledger file unreadable, starting empty");
                LoadReport {
                    ledger: Ledger::new(),
                    outcome: LoadOutcome::Malformed(err.to_string()),
                }
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        save_ledger_to_path(ledger, &self.path)?;
        info!(
            path = %self.path.display(),
            categories = ledger.category_count(),
            "ledger saved"
        );
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes the ledger next to `path` first, then renames it into place.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = to_pretty_json(ledger)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a ledger document, separating a missing file from undecodable content.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LedgerError::NotFound(path.to_path_buf()))
        }
        Err(err) => {
            return Err(LedgerError::MalformedFile {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
        }
    };
    serde_json::from_str(&data).map_err(|err| LedgerError::MalformedFile {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

fn to_pretty_json(ledger: &Ledger) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    ledger.serialize(&mut serializer)?;
    Ok(buffer)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
