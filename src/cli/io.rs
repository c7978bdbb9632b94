use std::io::{self, BufRead, Write};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::cli::core::CliError;
use crate::cli::output;

/// Source of user answers for the menu and the table view.
///
/// `Ok(None)` means the input ended (EOF or Ctrl-C); callers treat it as a request
/// to leave the current loop.
pub trait Prompter {
    fn line(&mut self, prompt: &str) -> Result<Option<String>, CliError>;
    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError>;
}

/// Terminal prompter with line editing and history.
pub struct ConsolePrompter {
    editor: DefaultEditor,
    theme: ColorfulTheme,
}

impl ConsolePrompter {
    pub fn new() -> Result<Self, CliError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            theme: ColorfulTheme::default(),
        })
    }
}

impl Prompter for ConsolePrompter {
    fn line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).ok();
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_opt()
            .map_err(CliError::from)
    }
}

/// Reads answers line by line from any buffered reader. Used for `--script` runs
/// and in tests.
pub struct ScriptPrompter<R> {
    reader: R,
}

impl<R: BufRead> ScriptPrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ScriptPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Prompter for ScriptPrompter<R> {
    fn line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            writeln!(stdout)?;
            return Ok(None);
        }
        writeln!(stdout)?;
        Ok(Some(buffer.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError> {
        loop {
            let Some(answer) = self.line(&format!("{prompt} (Y/N): "))? else {
                return Ok(None);
            };
            match parse_yes_no(&answer) {
                Some(choice) => return Ok(Some(choice)),
                None => output::warning("Please answer Y or N."),
            }
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn script_prompter_reads_lines_until_eof() {
        let mut prompter = ScriptPrompter::new(Cursor::new("Food\r\n12\n"));
        assert_eq!(prompter.line("> ").unwrap().as_deref(), Some("Food"));
        assert_eq!(prompter.line("> ").unwrap().as_deref(), Some("12"));
        assert_eq!(prompter.line("> ").unwrap(), None);
    }

    #[test]
    fn confirm_repeats_until_a_clear_answer() {
        let mut prompter = ScriptPrompter::new(Cursor::new("maybe\nY\n"));
        assert_eq!(prompter.confirm("Delete?").unwrap(), Some(true));

        let mut prompter = ScriptPrompter::new(Cursor::new("no\n"));
        assert_eq!(prompter.confirm("Delete?").unwrap(), Some(false));

        let mut prompter = ScriptPrompter::new(Cursor::new("what\n"));
        assert_eq!(prompter.confirm("Delete?").unwrap(), None);
    }
}
