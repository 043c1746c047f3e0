use crate::domain::AppError;
use crate::domain::settings::StoredValue;

/// Port for the flat key-value payload that captures a single invocation.
///
/// Typed getters return `None` for missing keys and for values that cannot be
/// read as the requested type.
pub trait ParameterStore {
    fn has(&self, key: &str) -> bool;

    fn get_boolean(&self, key: &str) -> Option<bool>;

    fn get_integer(&self, key: &str) -> Option<i64>;

    fn get_real(&self, key: &str) -> Option<f64>;

    fn get_string(&self, key: &str) -> Option<String>;

    /// Store a value. Text containing `"` is rejected.
    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), AppError>;
}
