//! Read-only tabular browser over a ledger file with search and toggling sorts.

use std::path::{Path, PathBuf};

use crate::cli::core::{parse_command_line, CliError, LoopControl};
use crate::cli::io::Prompter;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry, CommandResult};
use crate::cli::ui::table_renderer::{Alignment, Table, TableColumn};
use crate::core::services::{QueryService, SearchOutcome, SortColumn, SortDirection, SortToggle};
use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, TransactionRow};
use crate::storage::{JsonStorage, LoadOutcome, StorageBackend};

const CATEGORY_WIDTH: usize = 32;
const PROMPT: &str = "table> ";

pub struct TableView {
    source: Option<PathBuf>,
    ledger: Ledger,
    displayed: Vec<TransactionRow>,
    toggle: SortToggle,
    registry: CommandRegistry,
}

impl TableView {
    /// Loads `path` independently of any open store.
    pub fn open(path: &Path) -> (Self, LoadOutcome) {
        let report = JsonStorage::new(path).load();
        let mut view = Self::from_ledger(report.ledger);
        view.source = Some(path.to_path_buf());
        (view, report.outcome)
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        let mut registry = CommandRegistry::new();
        register_commands(&mut registry);
        Self {
            source: None,
            displayed: ledger.rows(),
            ledger,
            toggle: SortToggle::default(),
            registry,
        }
    }

    /// Rows in their current display order.
    pub fn rows(&self) -> &[TransactionRow] {
        &self.displayed
    }

    /// Filters the full ledger. The display is left alone when nothing matches.
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let outcome = QueryService::search(&self.ledger, query);
        if let SearchOutcome::Matches(found) = &outcome {
            self.displayed = found.rows();
        }
        outcome
    }

    /// Sorts the displayed rows; sorting the same column again flips the direction.
    /// On failure the display and the toggle are unchanged.
    pub fn sort(&mut self, column: SortColumn) -> Result<SortDirection> {
        let direction = self.toggle.direction_for(column);
        self.displayed = QueryService::sort(&self.displayed, column, direction)?;
        self.toggle.record(column, direction);
        Ok(direction)
    }

    pub fn reset(&mut self) {
        self.displayed = self.ledger.rows();
        self.toggle.reset();
    }

    /// Re-reads the source file, if the view was opened from one.
    pub fn reload(&mut self) -> Option<LoadOutcome> {
        let path = self.source.clone()?;
        let report = JsonStorage::new(&path).load();
        self.ledger = report.ledger;
        self.reset();
        Some(report.outcome)
    }

    pub fn render(&self) -> String {
        if self.displayed.is_empty() {
            return "No transactions to display.".to_string();
        }
        let mut table = Table::new(vec![
            TableColumn::new("Category", Alignment::Left).max_width(CATEGORY_WIDTH),
            TableColumn::new("Date", Alignment::Left),
            TableColumn::new("Amount", Alignment::Right),
        ]);
        for row in &self.displayed {
            table.push_row(vec![
                row.category.clone(),
                row.date.clone(),
                row.amount.to_string(),
            ]);
        }
        table.render()
    }

    /// Command loop. Returns on `back` or when input ends.
    pub fn run<P: Prompter + ?Sized>(&mut self, prompter: &mut P) -> std::result::Result<(), CliError> {
        output::section("Transactions");
        output::info(self.render());
        output::info("Type `help` to see available commands.");

        while let Some(line) = prompter.line(PROMPT)? {
            match self.handle_line(&line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(CliError::Ledger(err)) => output::error(err),
                Err(CliError::Parse(message)) => output::warning(message),
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> CommandResult {
        let tokens = parse_command_line(line)?;
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.registry.handler(&command) {
            Some(handler) => handler(self, &args),
            None => {
                output::warning(format!(
                    "Unknown command `{raw}`. Type `help` to see available commands."
                ));
                if let Some(best) = self.registry.suggest(&command) {
                    output::info(format!("Suggestion: `{best}`?"));
                }
                Ok(LoopControl::Continue)
            }
        }
    }
}

fn register_commands(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "search",
        "Show transactions whose category contains the text or whose amount equals it",
        "search <text>",
        cmd_search,
    ));
    registry.register(CommandEntry::new(
        "sort",
        "Sort by category, date or amount; repeat to reverse",
        "sort <category|date|amount>",
        cmd_sort,
    ));
    registry.register(CommandEntry::new(
        "reset",
        "Show every transaction in file order",
        "reset",
        cmd_reset,
    ));
    registry.register(CommandEntry::new(
        "reload",
        "Read the file again",
        "reload",
        cmd_reload,
    ));
    registry.register(CommandEntry::new("help", "List commands", "help", cmd_help));
    registry.register(CommandEntry::new(
        "back",
        "Leave the table view",
        "back",
        cmd_back,
    ));
}

fn usage(view: &TableView, name: &str) {
    if let Some(entry) = view.registry.get(name) {
        output::warning(format!("Usage: {}", entry.usage));
    }
}

fn cmd_search(view: &mut TableView, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        usage(view, "search");
        return Ok(LoopControl::Continue);
    }
    match view.search(&args.join(" ")) {
        SearchOutcome::NoTransactions => output::info("No transactions recorded yet."),
        SearchOutcome::NoMatches => output::info("No transactions found matching your search."),
        SearchOutcome::Matches(_) => output::info(view.render()),
    }
    Ok(LoopControl::Continue)
}

fn cmd_sort(view: &mut TableView, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        usage(view, "sort");
        return Ok(LoopControl::Continue);
    };
    let column = raw.parse::<SortColumn>().map_err(LedgerError::from)?;
    let direction = view.sort(column)?;
    let order = match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    output::info(format!("Sorted by {column} ({order})."));
    output::info(view.render());
    Ok(LoopControl::Continue)
}

fn cmd_reset(view: &mut TableView, _args: &[&str]) -> CommandResult {
    view.reset();
    output::info(view.render());
    Ok(LoopControl::Continue)
}

fn cmd_reload(view: &mut TableView, _args: &[&str]) -> CommandResult {
    match view.reload() {
        None => output::warning("This view was not opened from a file."),
        Some(LoadOutcome::Malformed(reason)) => {
            output::warning(format!("File is malformed ({reason}); showing an empty table."));
        }
        Some(_) => output::info(view.render()),
    }
    Ok(LoopControl::Continue)
}

fn cmd_help(view: &mut TableView, _args: &[&str]) -> CommandResult {
    output::section("Table commands");
    for entry in view.registry.list() {
        output::info(format!("  {:<32} {}", entry.usage, entry.description));
    }
    Ok(LoopControl::Continue)
}

fn cmd_back(_view: &mut TableView, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}
