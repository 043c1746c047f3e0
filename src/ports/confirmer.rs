use crate::domain::AppError;

/// Answer to a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// Port for blocking yes/no questions put to the user.
pub trait Confirmer {
    fn confirm(&mut self, message: &str) -> Result<Confirmation, AppError>;
}
