//! Search and sort over ledger snapshots. Nothing here mutates the ledger.

use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;

use crate::errors::{LedgerError, Result, ValidationError};
use crate::ledger::{Ledger, Transaction, TransactionRow, DATE_FORMAT};

/// Result of a search, keeping "nothing to search" apart from "nothing matched".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NoTransactions,
    NoMatches,
    Matches(Ledger),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Category,
    Date,
    Amount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [SortColumn::Category, SortColumn::Date, SortColumn::Amount];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Category => "Category",
            SortColumn::Date => "Date",
            SortColumn::Amount => "Amount",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = ValidationError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" | "1" => Ok(SortColumn::Category),
            "date" | "2" => Ok(SortColumn::Date),
            "amount" | "3" => Ok(SortColumn::Amount),
            _ => Err(ValidationError::InvalidFieldChoice(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Remembers the last sorted column so sorting it again flips the direction.
#[derive(Debug, Clone, Default)]
pub struct SortToggle {
    last: Option<(SortColumn, SortDirection)>,
}

impl SortToggle {
    /// Direction the next sort on `column` should use.
    pub fn direction_for(&self, column: SortColumn) -> SortDirection {
        match self.last {
            Some((last, direction)) if last == column => direction.reversed(),
            _ => SortDirection::Ascending,
        }
    }

    /// Records a sort that succeeded.
    pub fn record(&mut self, column: SortColumn, direction: SortDirection) {
        self.last = Some((column, direction));
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

pub struct QueryService;

impl QueryService {
    /// Keeps transactions whose category contains `query` (case-insensitive) or
    /// whose amount equals `query` read as a number. Empty categories are dropped.
    pub fn search(ledger: &Ledger, query: &str) -> SearchOutcome {
        if ledger.transaction_count() == 0 {
            return SearchOutcome::NoTransactions;
        }
        let needle = query.to_lowercase();
        let number = needle.trim().parse::<f64>().ok();

        let filtered: Ledger = ledger
            .categories()
            .filter_map(|(category, txns)| {
                let hits: Vec<Transaction> = txns
                    .iter()
                    .filter(|txn| Self::matches(category, txn, &needle, number))
                    .cloned()
                    .collect();
                (!hits.is_empty()).then(|| (category.to_string(), hits))
            })
            .collect();

        if filtered.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Matches(filtered)
        }
    }

    fn matches(category: &str, txn: &Transaction, needle: &str, number: Option<f64>) -> bool {
        if category.to_lowercase().contains(needle) {
            return true;
        }
        matches!((number, txn.amount.numeric()), (Some(query), Some(amount)) if query == amount)
    }

    /// Stable sort of display rows. Equal keys keep their incoming order in both
    /// directions. A non-numeric amount aborts an amount sort; an unparseable date
    /// sorts as the latest possible date.
    pub fn sort(
        rows: &[TransactionRow],
        column: SortColumn,
        direction: SortDirection,
    ) -> Result<Vec<TransactionRow>> {
        let mut keyed: Vec<(SortKey, &TransactionRow)> = rows
            .iter()
            .map(|row| SortKey::for_row(row, column).map(|key| (key, row)))
            .collect::<Result<_>>()?;

        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => b.compare(a),
        });

        Ok(keyed.into_iter().map(|(_, row)| row.clone()).collect())
    }
}

enum SortKey {
    Text(String),
    Date(NaiveDate),
    Number(f64),
}

impl SortKey {
    fn for_row(row: &TransactionRow, column: SortColumn) -> Result<Self> {
        Ok(match column {
            SortColumn::Category => SortKey::Text(row.category.trim().to_lowercase()),
            SortColumn::Date => SortKey::Date(
                NaiveDate::parse_from_str(&row.date, DATE_FORMAT).unwrap_or(NaiveDate::MAX),
            ),
            SortColumn::Amount => match row.amount.numeric() {
                Some(value) => SortKey::Number(value),
                None => {
                    return Err(LedgerError::SortData(format!(
                        "amount `{}` in category `{}` is not a number",
                        row.amount, row.category
                    )))
                }
            },
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }
}
