use std::io::ErrorKind;

use dialoguer::{Confirm, Error as DialoguerError};
use tracing::info;

use crate::domain::AppError;
use crate::ports::{Confirmation, Confirmer};

/// Asks on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, message: &str) -> Result<Confirmation, AppError> {
        match Confirm::new().with_prompt(message).default(false).interact() {
            Ok(true) => Ok(Confirmation::Yes),
            Ok(false) => Ok(Confirmation::No),
            Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => {
                Ok(Confirmation::No)
            }
            Err(err) => Err(AppError::Prompt(err.to_string())),
        }
    }
}

/// Answers every question with `No`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractiveConfirmer;

impl Confirmer for NonInteractiveConfirmer {
    fn confirm(&mut self, message: &str) -> Result<Confirmation, AppError> {
        info!(question = message, "no terminal available, answering no");
        Ok(Confirmation::No)
    }
}
