//! Bulk import of `expenseType,amount,date` lines into the store.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::info;

use crate::core::transaction_store::TransactionStore;
use crate::errors::{LedgerError, Result};
use crate::ledger::parse_amount;

const FIELD_COUNT: usize = 3;

/// How many records an import merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
}

/// One parsed import line.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub category: String,
    pub amount: f64,
    pub date: String,
}

/// Parses a single line. `line_no` is 1-based and only used for error messages.
pub fn parse_line(line: &str, line_no: usize) -> Result<ImportRecord> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(LedgerError::Import {
            line: line_no,
            reason: format!(
                "expected expense type, amount and date separated by commas, found {} field(s)",
                fields.len()
            ),
        });
    }
    let amount = parse_amount(fields[1]).map_err(|_| LedgerError::Import {
        line: line_no,
        reason: format!("`{}` is not a valid amount", fields[1]),
    })?;
    Ok(ImportRecord {
        category: fields[0].to_string(),
        amount,
        date: fields[2].to_string(),
    })
}

/// Merges every line of `reader` into the store, stopping at the first bad line.
/// Records merged before the failure stay in the store.
pub fn import_reader<R: BufRead>(store: &mut TransactionStore, reader: R) -> Result<ImportReport> {
    let mut imported = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(&line, idx + 1)?;
        store.import_record(&record.category, record.amount, &record.date);
        imported += 1;
    }
    Ok(ImportReport { imported })
}

pub fn import_file(store: &mut TransactionStore, path: &Path) -> Result<ImportReport> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => LedgerError::NotFound(path.to_path_buf()),
        _ => LedgerError::Io(err),
    })?;
    let report = import_reader(store, BufReader::new(file))?;
    info!(path = %path.display(), imported = report.imported, "bulk import finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn empty_store() -> (TransactionStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(temp.path().join("transactions.json"));
        (TransactionStore::open(Box::new(storage)).0, temp)
    }

    #[test]
    fn parse_line_splits_three_fields() {
        let record = parse_line("Food, 12.50,2024-01-05\n", 1).unwrap();
        assert_eq!(
            record,
            ImportRecord {
                category: "Food".into(),
                amount: 12.5,
                date: "2024-01-05".into(),
            }
        );
    }

    #[test]
    fn wrong_field_count_is_fatal() {
        let err = parse_line("Food,12.5", 4).unwrap_err();
        assert!(matches!(err, LedgerError::Import { line: 4, .. }));
        assert!(parse_line("Food,1,2024-01-01,extra", 1).is_err());
    }

    #[test]
    fn import_stops_at_first_bad_line_and_keeps_earlier_records() {
        let (mut store, _guard) = empty_store();
        let input = "Food,10,2024-01-05\nRent,900,2024-01-01\nbroken line\nTravel,50,2024-02-02\n";
        let err = import_reader(&mut store, Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LedgerError::Import { line: 3, .. }));

        let ledger = store.list_all();
        assert_eq!(ledger.category_names(), vec!["Food", "Rent"]);
        assert!(store.needs_commit());
    }

    #[test]
    fn bad_amount_is_fatal() {
        let (mut store, _guard) = empty_store();
        let err = import_reader(&mut store, Cursor::new("Food,ten,2024-01-05\n")).unwrap_err();
        assert!(matches!(err, LedgerError::Import { line: 1, ref reason } if reason.contains("ten")));
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn non_finite_amounts_stop_the_import() {
        for amount in ["nan", "inf", "-inf"] {
            let err = parse_line(&format!("Food,{amount},2024-01-05"), 2).unwrap_err();
            assert!(matches!(err, LedgerError::Import { line: 2, .. }));
        }

        let (mut store, _guard) = empty_store();
        let input = "Food,4,2024-01-05\nFood,NaN,2024-01-06\n";
        let err = import_reader(&mut store, Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LedgerError::Import { line: 2, .. }));
        assert_eq!(store.list_all().transaction_count(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (mut store, _guard) = empty_store();
        let report =
            import_reader(&mut store, Cursor::new("Food,1,2024-01-01\n\n  \nFood,2,2024-01-02\n"))
                .unwrap();
        assert_eq!(report, ImportReport { imported: 2 });
        assert_eq!(store.list_all().transactions("Food").unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let (mut store, temp) = empty_store();
        let err = import_file(&mut store, &temp.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
