use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for bsc operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// The run was started without any images.
    #[error("The file list is empty")]
    EmptyFileList,

    /// A stage parameter lies outside its accepted range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    ParameterOutOfRange { name: &'static str, value: f64, min: f64, max: f64 },

    /// Text cannot be stored in the invocation parameter backend.
    #[error("Parameter '{key}' cannot be stored: {reason}")]
    UnsafeParameterPayload { key: String, reason: String },

    /// No command is configured for an operator the run needs.
    #[error("Operator '{0}' is not configured in operators.toml")]
    OperatorNotConfigured(String),

    /// Operator command template failed to render.
    #[error("Failed to render arguments for operator '{operator}': {details}")]
    TemplateRender { operator: String, details: String },

    /// An external operator command failed.
    #[error("Operator '{operator}' failed: {details}")]
    OperatorFailed { operator: String, details: String },

    /// Buffer is not open in the session.
    #[error("No buffer named '{0}' is open")]
    BufferNotFound(String),

    /// Buffer content cannot be written in the requested format.
    #[error("Cannot save buffer '{buffer}' to {path}: {details}")]
    SaveFailed { buffer: String, path: PathBuf, details: String },

    /// Interactive prompt could not be shown or answered.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::EmptyFileList
            | AppError::ParameterOutOfRange { .. }
            | AppError::UnsafeParameterPayload { .. }
            | AppError::TemplateRender { .. }
            | AppError::TomlParse(_)
            | AppError::TomlWrite(_)
            | AppError::Json(_) => io::ErrorKind::InvalidInput,
            AppError::OperatorNotConfigured(_) | AppError::BufferNotFound(_) => {
                io::ErrorKind::NotFound
            }
            AppError::OperatorFailed { .. } | AppError::SaveFailed { .. } | AppError::Prompt(_) => {
                io::ErrorKind::Other
            }
        }
    }
}

/// Failure of a single item within a batch run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    /// The destination exists and overwriting it was not allowed.
    #[error("The file '{}' already exists.", .0.display())]
    PathConflict(PathBuf),

    /// The input file or buffer could not be opened.
    #[error("Error opening image '{item}': {details}")]
    Resolve { item: String, details: String },

    /// A stage failed or left the session without the buffer it reported.
    #[error("Stage '{stage}' failed: {details}")]
    StageExecution { stage: &'static str, details: String },

    /// The processed image could not be written to its destination.
    #[error("Error writing '{}': {details}", path.display())]
    Persist { path: PathBuf, details: String },
}
