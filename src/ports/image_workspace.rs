use std::path::Path;

use crate::domain::{AppError, FileType};

/// Port for the session of named, mutable image buffers.
///
/// Buffer names are unique within a session.
pub trait ImageWorkspace {
    fn has_buffer(&self, name: &str) -> bool;

    /// Names of every open buffer.
    fn buffer_names(&self) -> Vec<String>;

    /// Open an image file as a new buffer and return the buffer's name.
    fn open_file(&mut self, path: &Path) -> Result<String, AppError>;

    /// Create buffer `name` holding a copy of `source`.
    fn duplicate(&mut self, source: &str, name: &str) -> Result<(), AppError>;

    /// Replace the content of `target` with the content of `source`.
    fn assign(&mut self, source: &str, target: &str) -> Result<(), AppError>;

    /// Release a buffer.
    fn close(&mut self, name: &str) -> Result<(), AppError>;

    /// Write a buffer to `path` in the given format.
    fn save(&mut self, name: &str, path: &Path, file_type: FileType) -> Result<(), AppError>;
}
