use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{IndexTarget, LedgerError, Result, ValidationError};

use super::transaction::{Amount, Transaction};

/// Category name mapped to its transactions, in insertion order.
///
/// Serialized as a plain JSON object so the file stays hand-editable:
/// `{"Food": [{"amount": 10, "date": "2024-01-05"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    categories: IndexMap<String, Vec<Transaction>>,
}

/// One transaction flattened together with its category, as shown in tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub category: String,
    pub amount: Amount,
    pub date: String,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the ledger holds no categories at all.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Transaction])> + '_ {
        self.categories
            .iter()
            .map(|(name, txns)| (name.as_str(), txns.as_slice()))
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn transactions(&self, category: &str) -> Option<&[Transaction]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn category_at(&self, index: usize) -> Result<(&str, &[Transaction])> {
        self.categories
            .get_index(index)
            .map(|(name, txns)| (name.as_str(), txns.as_slice()))
            .ok_or_else(|| LedgerError::index(IndexTarget::Category, index))
    }

    /// Appends to `category`, creating it at the end when it is new.
    pub fn push(&mut self, category: impl Into<String>, transaction: Transaction) {
        self.categories
            .entry(category.into())
            .or_default()
            .push(transaction);
    }

    pub fn transaction_mut(
        &mut self,
        category_index: usize,
        transaction_index: usize,
    ) -> Result<&mut Transaction> {
        let (_, txns) = self
            .categories
            .get_index_mut(category_index)
            .ok_or_else(|| LedgerError::index(IndexTarget::Category, category_index))?;
        txns.get_mut(transaction_index)
            .ok_or_else(|| LedgerError::index(IndexTarget::Transaction, transaction_index))
    }

    /// Substitutes the key at `index`, keeping its transactions and its position.
    pub fn rename_category_at(&mut self, index: usize, new_name: &str) -> Result<()> {
        let current = match self.categories.get_index(index) {
            Some((name, _)) => name.clone(),
            None => return Err(LedgerError::index(IndexTarget::Category, index)),
        };
        if current == new_name {
            return Ok(());
        }
        if new_name.trim().is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }
        if self.categories.contains_key(new_name) {
            return Err(ValidationError::DuplicateCategory(new_name.to_string()).into());
        }
        if let Some((_, txns)) = self.categories.shift_remove_index(index) {
            self.categories.shift_insert(index, new_name.to_string(), txns);
        }
        Ok(())
    }

    pub fn remove_category_at(&mut self, index: usize) -> Result<(String, Vec<Transaction>)> {
        self.categories
            .shift_remove_index(index)
            .ok_or_else(|| LedgerError::index(IndexTarget::Category, index))
    }

    /// Removes one transaction; an emptied category stays in place.
    pub fn remove_transaction_at(
        &mut self,
        category_index: usize,
        transaction_index: usize,
    ) -> Result<Transaction> {
        let (_, txns) = self
            .categories
            .get_index_mut(category_index)
            .ok_or_else(|| LedgerError::index(IndexTarget::Category, category_index))?;
        if transaction_index >= txns.len() {
            return Err(LedgerError::index(
                IndexTarget::Transaction,
                transaction_index,
            ));
        }
        Ok(txns.remove(transaction_index))
    }

    /// Flattens the ledger into display order: categories in order, then their transactions.
    pub fn rows(&self) -> Vec<TransactionRow> {
        self.categories
            .iter()
            .flat_map(|(category, txns)| {
                txns.iter().map(move |txn| TransactionRow {
                    category: category.clone(),
                    amount: txn.amount.clone(),
                    date: txn.date.clone(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, Vec<Transaction>)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Transaction>)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}
