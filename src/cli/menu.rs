//! Numbered main menu driving the transaction store.

use std::fmt;
use std::path::PathBuf;

use crate::cli::core::{CliError, LoopControl};
use crate::cli::io::Prompter;
use crate::cli::output;
use crate::cli::report_load;
use crate::cli::table_view::TableView;
use crate::core::import::import_file;
use crate::core::services::{QueryService, SearchOutcome, Summary, SummaryService};
use crate::core::{TransactionStore, TransactionUpdate, UpdateField};
use crate::errors::{IndexTarget, LedgerError, ValidationError};
use crate::ledger::{parse_amount, validate_date, Ledger};

const MENU_ITEMS: [&str; 9] = [
    "Add transaction",
    "View transactions",
    "Update transaction",
    "Delete transaction",
    "Display summary",
    "Search transactions",
    "Bulk import from file",
    "Open table view",
    "Exit",
];

type Step = Result<LoopControl, CliError>;

/// Ends the current action when the prompter has no more input.
macro_rules! answer {
    ($expr:expr) => {
        match $expr? {
            Some(value) => value,
            None => return Ok(LoopControl::Exit),
        }
    };
}

pub struct Menu<P> {
    store: TransactionStore,
    prompter: P,
    currency_label: String,
}

impl<P: Prompter> Menu<P> {
    pub fn new(store: TransactionStore, prompter: P, currency_label: impl Into<String>) -> Self {
        Self {
            store,
            prompter,
            currency_label: currency_label.into(),
        }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn into_store(self) -> TransactionStore {
        self.store
    }

    /// Runs until the user exits or input ends, then makes the final commit.
    pub fn run(&mut self) -> Result<(), CliError> {
        loop {
            print_menu();
            let step = match self.prompter.line("Enter your choice: ") {
                Ok(Some(choice)) => self.dispatch(choice.trim()),
                Ok(None) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            };
            match step {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(CliError::Ledger(err)) => output::error(err),
                Err(other) => {
                    self.finish();
                    return Err(other);
                }
            }
        }
        self.finish();
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Step {
        match choice {
            "1" => self.add(),
            "2" => {
                self.view();
                Ok(LoopControl::Continue)
            }
            "3" => self.update(),
            "4" => self.delete(),
            "5" => {
                self.summary();
                Ok(LoopControl::Continue)
            }
            "6" => self.search(),
            "7" => self.bulk_import(),
            "8" => self.table_view(),
            "9" => Ok(LoopControl::Exit),
            _ => {
                output::warning(format!(
                    "Invalid choice `{choice}`. Please enter a number between 1 and {}.",
                    MENU_ITEMS.len()
                ));
                Ok(LoopControl::Continue)
            }
        }
    }

    fn add(&mut self) -> Step {
        let category = answer!(self.prompter.line("Enter category: "));
        let amount = answer!(self.ask_amount("Enter amount: "));
        let date = answer!(self.ask_date("Enter date (YYYY-MM-DD): "));
        self.store.add(category.trim(), amount, &date)?;
        self.commit_with("Transaction added.");
        Ok(LoopControl::Continue)
    }

    fn view(&self) {
        let ledger = self.store.list_all();
        if ledger.is_empty() {
            output::info("No transactions found to display.");
            return;
        }
        output::section("All transactions");
        print_ledger(ledger);
    }

    fn update(&mut self) -> Step {
        if self.store.list_all().transaction_count() == 0 {
            output::info("No transactions yet.");
            return Ok(LoopControl::Continue);
        }
        self.view();

        let category_index = answer!(self.ask_index("Enter the category number: "));
        let transaction_index = answer!(self.ask_index("Enter the transaction number: "));
        self.check_position(category_index, transaction_index)?;

        let field: UpdateField = answer!(self
            .prompter
            .line("What do you want to change? (c = category, a = amount, d = date): "))
        .parse::<UpdateField>()
        .map_err(LedgerError::from)?;
        let update = match field {
            UpdateField::Category => TransactionUpdate::Category(
                answer!(self.prompter.line("Enter the new category: "))
                    .trim()
                    .to_string(),
            ),
            UpdateField::Amount => {
                TransactionUpdate::Amount(answer!(self.ask_amount("Enter the new amount: ")))
            }
            UpdateField::Date => {
                TransactionUpdate::Date(answer!(self.ask_date("Enter the new date (YYYY-MM-DD): ")))
            }
        };

        self.store
            .update_by_index(category_index, transaction_index, update)?;
        if !self.store.needs_commit() {
            output::info("Nothing changed.");
            return Ok(LoopControl::Continue);
        }
        self.commit_with(format!("Transaction {field} updated."));
        self.summary();
        Ok(LoopControl::Continue)
    }

    fn delete(&mut self) -> Step {
        if self.store.list_all().is_empty() {
            output::info("No transactions found.");
            return Ok(LoopControl::Continue);
        }
        self.view();

        let full_category = answer!(self.prompter.confirm("Do you want to delete a full category?"));
        let category_index = answer!(self.ask_index("Enter the category number: "));

        if full_category {
            let (name, removed) = self.store.delete_category(category_index)?;
            self.commit_with(format!(
                "Category `{name}` deleted with {} transaction(s).",
                removed.len()
            ));
        } else {
            self.store.list_all().category_at(category_index)?;
            let transaction_index = answer!(self.ask_index("Enter the transaction number: "));
            let removed = self
                .store
                .delete_transaction(category_index, transaction_index)?;
            self.commit_with(format!(
                "Transaction of {} on {} deleted.",
                removed.amount, removed.date
            ));
        }
        Ok(LoopControl::Continue)
    }

    fn summary(&self) {
        let label = &self.currency_label;
        match SummaryService::summarize(self.store.list_all()) {
            Summary::NoTransactions => output::info("No transactions found."),
            Summary::Totals {
                per_category,
                grand_total,
                skipped,
            } => {
                output::section("Summary");
                output::info(format!("Total expenses: {label} {grand_total:.2}"));
                output::separator();
                for entry in per_category {
                    output::info(format!(
                        "{}: {label} {:.2} ({} transaction(s))",
                        entry.category, entry.total, entry.count
                    ));
                }
                if skipped > 0 {
                    output::warning(format!(
                        "{skipped} transaction(s) with a non-numeric amount were left out."
                    ));
                }
            }
        }
    }

    fn search(&mut self) -> Step {
        let query = answer!(self.prompter.line("Search by category or amount: "));
        match QueryService::search(self.store.list_all(), &query) {
            SearchOutcome::NoTransactions => output::info("No transactions found."),
            SearchOutcome::NoMatches => {
                output::info("No transactions found matching your search.")
            }
            SearchOutcome::Matches(found) => {
                output::section(format!(
                    "{} matching transaction(s)",
                    found.transaction_count()
                ));
                print_ledger(&found);
            }
        }
        Ok(LoopControl::Continue)
    }

    fn bulk_import(&mut self) -> Step {
        let raw = answer!(self.prompter.line("Enter the path of the file to import: "));
        let path = PathBuf::from(raw.trim());
        match import_file(&mut self.store, &path) {
            Ok(report) => {
                self.commit_with(format!("Imported {} transaction(s).", report.imported));
            }
            Err(err) => {
                output::error(err);
                if self.store.needs_commit() {
                    self.commit_with("Records read before the error were kept.");
                }
            }
        }
        Ok(LoopControl::Continue)
    }

    fn table_view(&mut self) -> Step {
        let path = self.store.storage().path().to_path_buf();
        let (mut view, outcome) = TableView::open(&path);
        report_load(&outcome, &path);
        view.run(&mut self.prompter)?;
        Ok(LoopControl::Continue)
    }

    fn finish(&mut self) {
        if !self.store.needs_commit() {
            return;
        }
        match self.store.commit() {
            Ok(()) => output::success("Transactions saved."),
            Err(err) => output::warning(format!("Could not save transactions: {err}")),
        }
    }

    fn commit_with(&mut self, message: impl fmt::Display) {
        match self.store.commit() {
            Ok(()) => output::success(message),
            Err(err) => output::error(format!("{message} Saving failed: {err}")),
        }
    }

    fn ask_amount(&mut self, prompt: &str) -> Result<Option<f64>, CliError> {
        loop {
            let Some(input) = self.prompter.line(prompt)? else {
                return Ok(None);
            };
            match parse_amount(&input) {
                Ok(amount) => return Ok(Some(amount)),
                Err(err) => output::error(err),
            }
        }
    }

    fn ask_date(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        loop {
            let Some(input) = self.prompter.line(prompt)? else {
                return Ok(None);
            };
            let date = input.trim();
            match validate_date(date) {
                Ok(_) => return Ok(Some(date.to_string())),
                Err(err) => output::error(err),
            }
        }
    }

    /// Reads a 1-based display number and returns the 0-based position.
    fn ask_index(&mut self, prompt: &str) -> Result<Option<usize>, CliError> {
        let Some(input) = self.prompter.line(prompt)? else {
            return Ok(None);
        };
        let number = input
            .trim()
            .parse::<usize>()
            .map_err(|_| LedgerError::from(ValidationError::InvalidNumber(input.clone())))?;
        // 0 wraps to an out-of-range position and is rejected by the store.
        Ok(Some(number.wrapping_sub(1)))
    }

    fn check_position(&self, category_index: usize, transaction_index: usize) -> Result<(), LedgerError> {
        let (_, transactions) = self.store.list_all().category_at(category_index)?;
        if transaction_index >= transactions.len() {
            return Err(LedgerError::index(IndexTarget::Transaction, transaction_index));
        }
        Ok(())
    }
}

fn print_menu() {
    output::section("Expense Ledger");
    for (idx, item) in MENU_ITEMS.iter().enumerate() {
        output::info(format!("{}. {item}", idx + 1));
    }
}

fn print_ledger(ledger: &Ledger) {
    for (category_no, (category, transactions)) in ledger.categories().enumerate() {
        output::separator();
        output::info(format!("{}) Expense type: {category}", category_no + 1));
        if transactions.is_empty() {
            output::info("   (no transactions)");
        }
        for (txn_no, txn) in transactions.iter().enumerate() {
            output::info(format!(
                "   {}. Amount: {}  Date: {}",
                txn_no + 1,
                txn.amount,
                txn.date
            ));
        }
    }
    output::separator();
}
