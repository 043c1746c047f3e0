use std::collections::VecDeque;

use crate::domain::AppError;
use crate::ports::{Confirmation, Confirmer};

/// Replays canned answers and records every question. Runs out as `No`.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<Confirmation>,
    questions: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[Confirmation]) -> Self {
        Self { answers: answers.iter().copied().collect(), questions: Vec::new() }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, message: &str) -> Result<Confirmation, AppError> {
        self.questions.push(message.to_string());
        Ok(self.answers.pop_front().unwrap_or(Confirmation::No))
    }
}
