//! Durable settings kept in a TOML file.
//!
//! Each `/`-separated key segment is a table, so `module/prefix/property`
//! becomes `[module.prefix] property = ...`.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::domain::AppError;
use crate::domain::settings::{StoredKind, StoredValue};
use crate::ports::SettingsStore;

#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
    root: Table,
    dirty: bool,
}

impl TomlSettingsStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let root = match fs::read_to_string(&path) {
            Ok(content) => content.parse::<Table>()?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, root, dirty: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn split(key: &str) -> Option<(Vec<&str>, &str)> {
        let mut segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        let leaf = segments.pop()?;
        Some((segments, leaf))
    }

    fn table(&self, path: &[&str]) -> Option<&Table> {
        let mut table = &self.root;
        for segment in path {
            table = table.get(*segment)?.as_table()?;
        }
        Some(table)
    }

    fn table_mut(&mut self, path: &[&str]) -> Option<&mut Table> {
        let mut table = &mut self.root;
        for segment in path {
            table = table.get_mut(*segment)?.as_table_mut()?;
        }
        Some(table)
    }

    /// Walk `path`, creating tables and replacing non-table values on the way.
    fn table_mut_or_create(&mut self, path: &[&str]) -> Option<&mut Table> {
        let mut table = &mut self.root;
        for segment in path {
            let entry = table.entry(segment.to_string()).or_insert_with(|| Value::Table(Table::new()));
            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }
            table = entry.as_table_mut()?;
        }
        Some(table)
    }

    fn remove_entry(&mut self, key: &str) {
        let Some((parents, leaf)) = Self::split(key) else {
            return;
        };
        let removed = self.table_mut(&parents).and_then(|table| table.remove(leaf)).is_some();
        if removed {
            self.prune_empty(&parents);
            self.dirty = true;
        }
    }

    /// Drop tables left empty along `path`, deepest first.
    fn prune_empty(&mut self, path: &[&str]) {
        for depth in (1..=path.len()).rev() {
            let (parents, name) = (&path[..depth - 1], path[depth - 1]);
            let Some(parent) = self.table_mut(parents) else {
                return;
            };
            let empty = parent.get(name).and_then(Value::as_table).is_some_and(Table::is_empty);
            if !empty {
                return;
            }
            parent.remove(name);
        }
    }
}

fn to_stored(value: &Value, kind: StoredKind) -> Option<StoredValue> {
    match (kind, value) {
        (StoredKind::Boolean, Value::Boolean(value)) => Some(StoredValue::Boolean(*value)),
        (StoredKind::Integer, Value::Integer(value)) => Some(StoredValue::Integer(*value)),
        (StoredKind::Real, Value::Float(value)) => Some(StoredValue::Real(*value)),
        (StoredKind::Text, Value::String(value)) => Some(StoredValue::Text(value.clone())),
        _ => None,
    }
}

fn to_toml(value: StoredValue) -> Value {
    match value {
        StoredValue::Boolean(value) => Value::Boolean(value),
        StoredValue::Integer(value) => Value::Integer(value),
        StoredValue::Real(value) => Value::Float(value),
        StoredValue::Text(value) => Value::String(value),
    }
}

impl SettingsStore for TomlSettingsStore {
    fn read(&self, key: &str, kind: StoredKind) -> Option<StoredValue> {
        let (parents, leaf) = Self::split(key)?;
        let value = self.table(&parents)?.get(leaf)?;
        to_stored(value, kind)
    }

    fn write(&mut self, key: &str, value: StoredValue) -> Result<(), AppError> {
        let invalid = || AppError::config_error(format!("Invalid settings key '{key}'"));
        let (parents, leaf) = Self::split(key).ok_or_else(invalid)?;
        self.table_mut_or_create(&parents).ok_or_else(invalid)?.insert(leaf.to_string(), to_toml(value));
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.remove_entry(key);
        Ok(())
    }

    fn remove_subtree(&mut self, root: &str) -> Result<(), AppError> {
        self.remove_entry(root);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AppError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&self.root)?;
        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, content)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "settings written");
        self.dirty = false;
        Ok(())
    }
}
