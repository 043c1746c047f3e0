use std::collections::BTreeMap;

use crate::domain::AppError;
use crate::domain::settings::{StoredKind, StoredValue};
use crate::ports::SettingsStore;

/// In-memory settings store keyed by full `/`-separated paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self, key: &str, kind: StoredKind) -> Option<StoredValue> {
        self.values.get(key).filter(|value| value.kind() == kind).cloned()
    }

    fn write(&mut self, key: &str, value: StoredValue) -> Result<(), AppError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.values.remove(key);
        Ok(())
    }

    fn remove_subtree(&mut self, root: &str) -> Result<(), AppError> {
        let nested = format!("{root}/");
        self.values.retain(|key, _| key != root && !key.starts_with(&nested));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_requires_matching_kind() {
        let mut store = MemorySettingsStore::new();
        store.write("m/p/flag", StoredValue::Boolean(true)).unwrap();

        assert_eq!(store.read("m/p/flag", StoredKind::Boolean), Some(StoredValue::Boolean(true)));
        assert_eq!(store.read("m/p/flag", StoredKind::Text), None);
        assert_eq!(store.read("m/p/missing", StoredKind::Boolean), None);
    }

    #[test]
    fn remove_subtree_keeps_siblings_with_shared_prefix() {
        let mut store = MemorySettingsStore::new();
        store.write("m/engine/a", StoredValue::Integer(1)).unwrap();
        store.write("m/engine2/a", StoredValue::Integer(2)).unwrap();

        store.remove_subtree("m/engine").unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["m/engine2/a"]);
    }
}
