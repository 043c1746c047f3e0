use std::fmt;
use std::path::PathBuf;

use crate::domain::ItemError;

use super::file_item::FileItem;

/// Where a processed item ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Written to this file.
    File(PathBuf),
    /// Left open and modified in the session under this name.
    Buffer(String),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Buffer(name) => write!(f, "buffer '{name}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutput {
    pub item: FileItem,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub item: FileItem,
    pub error: ItemError,
}

/// Result of a batch run. Failures are recorded here rather than returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub processed_count: usize,
    pub outputs: Vec<ItemOutput>,
    pub errors: Vec<ItemFailure>,
    /// The run stopped before reaching the end of the list.
    pub aborted: bool,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable end-of-run summary.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return "Process finished successfully.".to_string();
        }
        let mut summary = format!("Process finished with {} errors.", self.errors.len());
        for failure in &self.errors {
            summary.push_str(&format!("\n{}:\n    {}", failure.item, failure.error));
        }
        if self.aborted {
            summary.push_str("\nRun stopped before all items were processed.");
        }
        summary
    }
}
