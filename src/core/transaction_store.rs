//! The single owner of the in-memory ledger for one run.

use std::{fmt, str::FromStr};

use tracing::{debug, warn};

use crate::errors::{Result, ValidationError};
use crate::ledger::{ensure_finite, validate_date, Amount, Ledger, Transaction};
use crate::storage::{LoadOutcome, StorageBackend};

/// Field picked by the user when updating a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    Category,
    Amount,
    Date,
}

impl FromStr for UpdateField {
    type Err = ValidationError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "c" | "category" => Ok(UpdateField::Category),
            "a" | "amount" => Ok(UpdateField::Amount),
            "d" | "date" => Ok(UpdateField::Date),
            _ => Err(ValidationError::InvalidFieldChoice(value.to_string())),
        }
    }
}

impl fmt::Display for UpdateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateField::Category => f.write_str("category"),
            UpdateField::Amount => f.write_str("amount"),
            UpdateField::Date => f.write_str("date"),
        }
    }
}

/// A field together with its replacement value.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionUpdate {
    Category(String),
    Amount(f64),
    Date(String),
}

impl TransactionUpdate {
    pub fn field(&self) -> UpdateField {
        match self {
            TransactionUpdate::Category(_) => UpdateField::Category,
            TransactionUpdate::Amount(_) => UpdateField::Amount,
            TransactionUpdate::Date(_) => UpdateField::Date,
        }
    }
}

/// Owns the ledger and the backend it commits to.
///
/// Mutations only touch memory and mark a commit as pending; callers decide when
/// to [`commit`](TransactionStore::commit) so bulk imports can be batched.
pub struct TransactionStore {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    dirty: bool,
}

impl TransactionStore {
    /// Loads the backend's document and returns the store with the load outcome.
    pub fn open(storage: Box<dyn StorageBackend>) -> (Self, LoadOutcome) {
        let report = storage.load();
        let store = Self {
            ledger: report.ledger,
            storage,
            dirty: false,
        };
        (store, report.outcome)
    }

    pub fn with_ledger(ledger: Ledger, storage: Box<dyn StorageBackend>) -> Self {
        Self {
            ledger,
            storage,
            dirty: false,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Read-only snapshot for display, search, sort and summaries.
    pub fn list_all(&self) -> &Ledger {
        &self.ledger
    }

    pub fn needs_commit(&self) -> bool {
        self.dirty
    }

    /// Appends an interactively entered transaction after validating it.
    pub fn add(&mut self, category: &str, amount: f64, date: &str) -> Result<()> {
        if category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }
        ensure_finite(amount)?;
        validate_date(date)?;
        self.ledger.push(category, Transaction::new(amount, date));
        self.dirty = true;
        debug!(category, amount, date, "transaction added");
        Ok(())
    }

    /// Appends a bulk-imported record. Dates are kept as given.
    pub fn import_record(&mut self, category: &str, amount: f64, date: &str) {
        self.ledger.push(category, Transaction::new(amount, date));
        self.dirty = true;
    }

    /// Applies `update` to the transaction at the given positions. Renaming a
    /// category to its current name changes nothing and leaves no commit pending.
    pub fn update_by_index(
        &mut self,
        category_index: usize,
        transaction_index: usize,
        update: TransactionUpdate,
    ) -> Result<()> {
        let field = update.field();
        match update {
            TransactionUpdate::Amount(amount) => {
                let txn = self.ledger.transaction_mut(category_index, transaction_index)?;
                txn.amount = Amount::Value(ensure_finite(amount)?);
            }
            TransactionUpdate::Date(date) => {
                let txn = self.ledger.transaction_mut(category_index, transaction_index)?;
                validate_date(&date)?;
                txn.date = date;
            }
            TransactionUpdate::Category(name) => {
                self.ledger.transaction_mut(category_index, transaction_index)?;
                if self.ledger.category_at(category_index)?.0 == name {
                    return Ok(());
                }
                self.ledger.rename_category_at(category_index, &name)?;
            }
        }
        self.dirty = true;
        debug!(category_index, transaction_index, %field, "transaction updated");
        Ok(())
    }

    /// Removes a whole category and returns its name and transactions.
    pub fn delete_category(&mut self, category_index: usize) -> Result<(String, Vec<Transaction>)> {
        let removed = self.ledger.remove_category_at(category_index)?;
        self.dirty = true;
        debug!(category = %removed.0, "category deleted");
        Ok(removed)
    }

    pub fn delete_transaction(
        &mut self,
        category_index: usize,
        transaction_index: usize,
    ) -> Result<Transaction> {
        let removed = self
            .ledger
            .remove_transaction_at(category_index, transaction_index)?;
        self.dirty = true;
        debug!(category_index, transaction_index, "transaction deleted");
        Ok(removed)
    }

    /// Writes the full ledger through the backend.
    pub fn commit(&mut self) -> Result<()> {
        match self.storage.save(&self.ledger) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, path = %self.storage.path().display(), "commit failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionStore")
            .field("path", &self.storage.path())
            .field("categories", &self.ledger.category_count())
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{IndexTarget, LedgerError};
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (TransactionStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().join("transactions.json"));
        let (store, outcome) = TransactionStore::open(Box::new(storage));
        assert_eq!(outcome, LoadOutcome::Missing);
        (store, temp)
    }

    fn seeded() -> (TransactionStore, TempDir) {
        let (mut store, temp) = store_with_temp_dir();
        store.add("Food", 10.0, "2024-01-05").unwrap();
        store.add("Food", 5.0, "2024-02-01").unwrap();
        store.add("Rent", 900.0, "2024-01-01").unwrap();
        store.add("Travel", 120.0, "2024-03-10").unwrap();
        (store, temp)
    }

    #[test]
    fn add_validates_date_and_category() {
        let (mut store, _guard) = store_with_temp_dir();
        assert!(matches!(
            store.add("Food", 1.0, "2024/01/01"),
            Err(LedgerError::Validation(ValidationError::InvalidDate(_)))
        ));
        assert!(matches!(
            store.add("  ", 1.0, "2024-01-01"),
            Err(LedgerError::Validation(ValidationError::EmptyCategory))
        ));
        assert!(store.list_all().is_empty());
        assert!(!store.needs_commit());
    }

    #[test]
    fn add_marks_commit_pending_without_saving() {
        let (mut store, _guard) = store_with_temp_dir();
        store.add("Food", 3.5, "2024-01-01").unwrap();
        assert!(store.needs_commit());
        assert!(!store.storage().path().exists());

        store.commit().unwrap();
        assert!(!store.needs_commit());
        assert!(store.storage().path().exists());
    }

    #[test]
    fn import_record_keeps_unvalidated_dates() {
        let (mut store, _guard) = store_with_temp_dir();
        store.import_record("Misc", 2.0, "someday");
        assert_eq!(store.list_all().transactions("Misc").unwrap()[0].date, "someday");
    }

    #[test]
    fn update_amount_and_date() {
        let (mut store, _guard) = seeded();
        store
            .update_by_index(0, 1, TransactionUpdate::Amount(7.25))
            .unwrap();
        store
            .update_by_index(0, 1, TransactionUpdate::Date("2024-02-02".into()))
            .unwrap();
        let food = store.list_all().transactions("Food").unwrap();
        assert_eq!(food[1], Transaction::new(7.25, "2024-02-02"));
        assert_eq!(food[0], Transaction::new(10.0, "2024-01-05"));
    }

    #[test]
    fn update_rejects_bad_date_without_touching_record() {
        let (mut store, _guard) = seeded();
        let err = store
            .update_by_index(1, 0, TransactionUpdate::Date("01-01-2024".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::InvalidDate(_))
        ));
        assert_eq!(store.list_all().transactions("Rent").unwrap()[0].date, "2024-01-01");
    }

    #[test]
    fn non_finite_amounts_are_refused() {
        let (mut store, _guard) = seeded();
        store.commit().unwrap();
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                store.add("Food", amount, "2024-01-01"),
                Err(LedgerError::Validation(ValidationError::InvalidAmount(_)))
            ));
            assert!(matches!(
                store.update_by_index(0, 0, TransactionUpdate::Amount(amount)),
                Err(LedgerError::Validation(ValidationError::InvalidAmount(_)))
            ));
        }
        assert_eq!(
            store.list_all().transactions("Food").unwrap()[0],
            Transaction::new(10.0, "2024-01-05")
        );
        assert_eq!(store.list_all().transaction_count(), 4);
        assert!(!store.needs_commit());
    }

    #[test]
    fn rename_to_current_name_leaves_nothing_to_commit() {
        let (mut store, _guard) = seeded();
        store.commit().unwrap();
        store
            .update_by_index(1, 0, TransactionUpdate::Category("Rent".into()))
            .unwrap();
        assert!(!store.needs_commit());

        store
            .update_by_index(1, 0, TransactionUpdate::Category("Housing".into()))
            .unwrap();
        assert!(store.needs_commit());
    }

    #[test]
    fn rename_requires_a_valid_transaction_index() {
        let (mut store, _guard) = seeded();
        let err = store
            .update_by_index(1, 5, TransactionUpdate::Category("Housing".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Index {
                target: IndexTarget::Transaction,
                ..
            }
        ));
        assert_eq!(store.list_all().category_names(), vec!["Food", "Rent", "Travel"]);
    }

    #[test]
    fn rename_preserves_sequence_and_order() {
        let (mut store, _guard) = seeded();
        let food = store.list_all().transactions("Food").unwrap().to_vec();
        store
            .update_by_index(0, 0, TransactionUpdate::Category("Groceries".into()))
            .unwrap();
        let ledger = store.list_all();
        assert_eq!(ledger.category_names(), vec!["Groceries", "Rent", "Travel"]);
        assert_eq!(ledger.transactions("Groceries").unwrap(), food.as_slice());
    }

    #[test]
    fn out_of_range_category_index_is_reported() {
        let (mut store, _guard) = seeded();
        let err = store
            .update_by_index(3, 0, TransactionUpdate::Amount(1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Index {
                target: IndexTarget::Category,
                position: 3
            }
        ));
        assert!(matches!(
            store.delete_category(3),
            Err(LedgerError::Index { .. })
        ));
    }

    #[test]
    fn delete_transaction_leaves_others_untouched() {
        let (mut store, _guard) = seeded();
        let before = store.list_all().clone();
        let removed = store.delete_transaction(0, 0).unwrap();
        assert_eq!(removed, Transaction::new(10.0, "2024-01-05"));

        let after = store.list_all();
        assert_eq!(after.transactions("Food").unwrap().len(), 1);
        assert_eq!(after.transactions("Rent"), before.transactions("Rent"));
        assert_eq!(after.transactions("Travel"), before.transactions("Travel"));
    }

    #[test]
    fn deleting_last_transaction_keeps_empty_category() {
        let (mut store, _guard) = seeded();
        store.delete_transaction(1, 0).unwrap();
        assert_eq!(store.list_all().category_count(), 3);
        assert!(store.list_all().transactions("Rent").unwrap().is_empty());
    }

    #[test]
    fn delete_category_removes_its_transactions() {
        let (mut store, _guard) = seeded();
        let (name, txns) = store.delete_category(1).unwrap();
        assert_eq!(name, "Rent");
        assert_eq!(txns.len(), 1);
        assert_eq!(store.list_all().category_names(), vec!["Food", "Travel"]);
    }

    #[test]
    fn field_choice_parsing() {
        assert_eq!("A".parse::<UpdateField>(), Ok(UpdateField::Amount));
        assert_eq!(" date ".parse::<UpdateField>(), Ok(UpdateField::Date));
        assert_eq!("c".parse::<UpdateField>(), Ok(UpdateField::Category));
        assert_eq!(
            "x".parse::<UpdateField>(),
            Err(ValidationError::InvalidFieldChoice("x".into()))
        );
    }
}
