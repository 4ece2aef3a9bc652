//! Terminal questions.

use std::io::{self, BufRead, Write};

use crate::error::SyncError;

/// Asks the user a question and returns the answer without its line ending.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<String, SyncError>;
}

/// [`Prompt`] over any reader/writer pair; [`StdinPrompt::stdio`] for the
/// real terminal.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<String, SyncError> {
        write!(self.output, "{question}").map_err(SyncError::Terminal)?;
        self.output.flush().map_err(SyncError::Terminal)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(SyncError::Terminal)?;
        if read == 0 {
            return Err(SyncError::Terminal(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            )));
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}
