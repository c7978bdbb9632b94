pub mod core;
pub mod io;
pub mod menu;
pub mod output;
pub mod registry;
pub mod table_view;
pub mod ui;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{Config, ConfigManager};
use crate::core::import::import_file;
use crate::core::TransactionStore;
use crate::storage::{JsonStorage, LoadOutcome};

pub use self::core::{CliError, CliMode};
use self::io::{ConsolePrompter, Prompter, ScriptPrompter};
use self::menu::Menu;
use self::output::OutputPreferences;
use self::table_view::TableView;

/// Environment variable that switches the binary to script mode.
pub const SCRIPT_ENV: &str = "EXPENSE_LEDGER_SCRIPT";

/// What the binary was asked to do.
#[derive(Debug, Clone)]
pub struct CliOptions {
    /// Overrides the configured data file.
    pub data_file: Option<PathBuf>,
    /// Bulk import run before the menu opens.
    pub import: Option<PathBuf>,
    /// Open only the read-only table view.
    pub view_only: bool,
    pub mode: CliMode,
}

pub fn run_cli(options: CliOptions) -> Result<(), CliError> {
    let manager = ConfigManager::new();
    let config = manager.load()?;
    crate::init(&config.log_level);
    output::set_preferences(OutputPreferences {
        plain_mode: config.plain_output || options.mode == CliMode::Script,
        quiet_mode: false,
    });

    let path = options
        .data_file
        .clone()
        .unwrap_or_else(|| manager.data_file(&config));
    info!(path = %path.display(), mode = ?options.mode, "starting expense ledger");

    match options.mode {
        CliMode::Interactive => run_with(&options, &config, &path, ConsolePrompter::new()?),
        CliMode::Script => run_with(&options, &config, &path, ScriptPrompter::stdin()),
    }
}

fn run_with<P: Prompter>(
    options: &CliOptions,
    config: &Config,
    path: &Path,
    mut prompter: P,
) -> Result<(), CliError> {
    if options.view_only {
        let (mut view, outcome) = TableView::open(path);
        report_load(&outcome, path);
        return view.run(&mut prompter);
    }

    let (mut store, outcome) = TransactionStore::open(Box::new(JsonStorage::new(path)));
    report_load(&outcome, path);

    if let Some(import) = &options.import {
        match import_file(&mut store, import) {
            Ok(report) => output::success(format!(
                "Imported {} transaction(s) from `{}`.",
                report.imported,
                import.display()
            )),
            Err(err) => output::error(err),
        }
        if store.needs_commit() {
            if let Err(err) = store.commit() {
                output::warning(format!("Could not save imported transactions: {err}"));
            }
        }
    }

    Menu::new(store, prompter, config.currency_label.clone()).run()
}

/// Tells the user how loading the data file went.
pub(crate) fn report_load(outcome: &LoadOutcome, path: &Path) {
    match outcome {
        LoadOutcome::Loaded => output::info(format!("Transactions loaded from `{}`.", path.display())),
        LoadOutcome::Missing => output::info(format!(
            "`{}` not found. Starting with no transactions.",
            path.display()
        )),
        LoadOutcome::Malformed(reason) => output::warning(format!(
            "`{}` could not be read ({reason}). Starting with no transactions.",
            path.display()
        )),
    }
}
