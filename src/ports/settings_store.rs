use crate::domain::AppError;
use crate::domain::settings::{StoredKind, StoredValue};

/// Port for the durable, hierarchical settings store that survives runs.
///
/// Keys are `/`-separated paths such as `module/prefix/property`.
pub trait SettingsStore {
    /// Read a value of the given kind.
    ///
    /// Returns `None` when the key is missing or holds a value of another kind.
    fn read(&self, key: &str, kind: StoredKind) -> Option<StoredValue>;

    /// Write a value, replacing whatever the key held before.
    fn write(&mut self, key: &str, value: StoredValue) -> Result<(), AppError>;

    /// Delete a single key. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), AppError>;

    /// Delete `root` and every key below it.
    fn remove_subtree(&mut self, root: &str) -> Result<(), AppError>;

    /// Make pending changes durable.
    fn flush(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}
