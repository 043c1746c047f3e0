use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Reserved prefix marking an item as an open buffer rather than a file.
pub const BUFFER_PREFIX: &str = "window:";

/// One entry of the batch: an image file or an already-open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileItem {
    File(PathBuf),
    Buffer(String),
}

impl FileItem {
    /// Parse the stored form. Blank entries yield `None`.
    pub fn parse(stored: &str) -> Option<Self> {
        let stored = stored.trim();
        if stored.is_empty() {
            return None;
        }
        match stored.strip_prefix(BUFFER_PREFIX) {
            Some(name) if !name.is_empty() => Some(FileItem::Buffer(name.to_string())),
            Some(_) => None,
            None => Some(FileItem::File(PathBuf::from(stored))),
        }
    }

    /// Reject items the `|`-joined file list cannot hold.
    pub fn check_storable(&self) -> Result<(), AppError> {
        let stored = self.to_stored();
        if stored.contains('|') {
            return Err(AppError::config_error(format!(
                "'{stored}' contains '|', which the file list cannot store"
            )));
        }
        Ok(())
    }

    /// The string form persisted in the file list.
    pub fn to_stored(&self) -> String {
        match self {
            FileItem::File(path) => path.to_string_lossy().into_owned(),
            FileItem::Buffer(name) => format!("{BUFFER_PREFIX}{name}"),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            FileItem::File(path) => Some(path),
            FileItem::Buffer(_) => None,
        }
    }
}

impl fmt::Display for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileItem::File(path) => write!(f, "{}", path.display()),
            FileItem::Buffer(name) => write!(f, "{name}"),
        }
    }
}
