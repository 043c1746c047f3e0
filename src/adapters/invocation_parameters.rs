use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::AppError;
use crate::domain::settings::StoredValue;
use crate::ports::ParameterStore;

/// Flat parameter payload of one invocation, persisted as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationParameters {
    values: BTreeMap<String, StoredValue>,
}

impl InvocationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|err| {
            AppError::config_error(format!(
                "Failed to read parameters file {}: {}",
                path.display(),
                err
            ))
        })?;
        let values: BTreeMap<String, StoredValue> = serde_json::from_str(&content)?;
        if let Some((key, _)) = values.iter().find(|(_, value)| contains_quote(value)) {
            return Err(unsafe_payload(key));
        }
        Ok(Self { values })
    }

    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(&self.values)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

fn contains_quote(value: &StoredValue) -> bool {
    value.as_text().is_some_and(|text| text.contains('"'))
}

fn unsafe_payload(key: &str) -> AppError {
    AppError::UnsafeParameterPayload {
        key: key.to_string(),
        reason: "text values cannot contain '\"'".to_string(),
    }
}

impl ParameterStore for InvocationParameters {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get_boolean(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            StoredValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    fn get_integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            StoredValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    fn get_real(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            StoredValue::Real(value) => Some(*value),
            StoredValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key)?.as_text().map(str::to_string)
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), AppError> {
        if contains_quote(&value) {
            return Err(unsafe_payload(key));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
