//! Numbered-menu selection, independent of any terminal.
//!
//! Menus are rendered 1-based. [`select`] maps the user's raw answer back to
//! an option; the caller decides what to do with a bad answer (the sync flow
//! treats it as a cancellation).

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Selection {choice} is out of range (1-{len})")]
    OutOfRange { choice: usize, len: usize },
}

/// Pick an option by its 1-based menu number.
pub fn select<T: Clone>(options: &[T], input: &str) -> Result<T, SelectionError> {
    let trimmed = input.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;

    choice
        .checked_sub(1)
        .and_then(|index| options.get(index))
        .cloned()
        .ok_or(SelectionError::OutOfRange {
            choice,
            len: options.len(),
        })
}

/// Render options as a numbered list, one per line.
pub fn render_menu<T: fmt::Display>(options: &[T]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{:>3}) {option}\n", i + 1))
        .collect()
}
