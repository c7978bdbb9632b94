use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use expense_ledger::cli::{run_cli, CliMode, CliOptions, SCRIPT_ENV};

/// Personal expense ledger kept in a JSON file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Ledger file to open instead of the configured one.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Bulk import `expenseType,amount,date` lines before opening the menu.
    #[arg(long, value_name = "PATH")]
    import: Option<PathBuf>,

    /// Open only the read-only table view.
    #[arg(long)]
    view: bool,

    /// Read answers line by line from stdin.
    #[arg(long)]
    script: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let script = args.script || std::env::var_os(SCRIPT_ENV).is_some();

    let options = CliOptions {
        data_file: args.file,
        import: args.import,
        view_only: args.view,
        mode: if script {
            CliMode::Script
        } else {
            CliMode::Interactive
        },
    };

    match run_cli(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
