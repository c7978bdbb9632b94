use std::io;

use rustyline::error::ReadlineError;
use shell_words::split;
use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::LedgerError;

/// Failures surfaced by the interactive front ends.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Input error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Could not parse command: {0}")]
    Parse(String),
}

/// Where answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    /// Answers are read line by line from stdin without line editing.
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Splits a command line the way a shell would, honouring quotes.
pub fn parse_command_line(input: &str) -> Result<Vec<String>, CliError> {
    split(input).map_err(|err| CliError::Parse(err.to_string()))
}
