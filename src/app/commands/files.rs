use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::domain::pipeline::{BUFFER_PREFIX, EngineSettings, FileItem};
use crate::domain::settings::Persistable;
use crate::ports::SettingsStore;

use super::settings::load;

/// Change to the stored file list.
#[derive(Debug, Clone, PartialEq)]
pub enum FilesAction {
    List,
    Add(Vec<PathBuf>),
    AddBuffers(Vec<String>),
    Remove(Vec<String>),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilesOutcome {
    /// The list after the action.
    pub files: Vec<FileItem>,
    /// Entries added or removed.
    pub changed: usize,
}

pub fn execute(store: &mut dyn SettingsStore, action: FilesAction) -> Result<FilesOutcome, AppError> {
    let mut settings = load(store);
    let changed = match action {
        FilesAction::List => return Ok(FilesOutcome { files: settings.files, changed: 0 }),
        FilesAction::Add(paths) => {
            let items = paths
                .iter()
                .map(|path| existing_file(path).map(FileItem::File))
                .collect::<Result<Vec<_>, _>>()?;
            settings.add_files(items)?
        }
        FilesAction::AddBuffers(names) => {
            let items = names
                .iter()
                .map(|name| {
                    FileItem::parse(&format!("{BUFFER_PREFIX}{}", name.trim_start_matches(BUFFER_PREFIX)))
                        .ok_or_else(|| AppError::config_error("Buffer name cannot be empty"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            settings.add_files(items)?
        }
        FilesAction::Remove(entries) => remove(&mut settings, &entries)?,
        FilesAction::Clear => std::mem::take(&mut settings.files).len(),
    };

    settings.save_to_durable_store(store)?;
    store.flush()?;
    Ok(FilesOutcome { files: settings.files, changed })
}

/// Parse a command-line item, making file paths absolute.
pub fn parse_item(entry: &str) -> Result<FileItem, AppError> {
    let item = match FileItem::parse(entry) {
        Some(FileItem::File(path)) => FileItem::File(std::path::absolute(&path)?),
        Some(item) => item,
        None => {
            return Err(AppError::config_error(format!(
                "'{entry}' is not a file or buffer reference"
            )));
        }
    };
    item.check_storable()?;
    Ok(item)
}

fn existing_file(path: &Path) -> Result<PathBuf, AppError> {
    fs::canonicalize(path)
        .ok()
        .filter(|path| path.is_file())
        .ok_or_else(|| AppError::config_error(format!("File not found: {}", path.display())))
}

fn remove(settings: &mut EngineSettings, entries: &[String]) -> Result<usize, AppError> {
    let targets = entries.iter().map(|entry| parse_item(entry)).collect::<Result<Vec<_>, _>>()?;
    let before = settings.files.len();
    settings.files.retain(|item| !targets.contains(item));
    Ok(before - settings.files.len())
}
