use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::pipeline::{buffer_name_from_stem, unique_buffer_name};
use crate::domain::{AppError, FileType};
use crate::ports::ImageWorkspace;

/// In-memory session whose buffers hold plain strings.
#[derive(Debug, Default)]
pub struct FakeWorkspace {
    buffers: BTreeMap<String, String>,
    created: Vec<String>,
    saved: Vec<(PathBuf, FileType)>,
    fail_saves: bool,
}

#[allow(dead_code)]
impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, content: &str) {
        self.buffers.insert(name.to_string(), content.to_string());
    }

    pub fn content(&self, name: &str) -> Option<String> {
        self.buffers.get(name).cloned()
    }

    /// Every buffer name created through the port, in order.
    pub fn created(&self) -> &[String] {
        &self.created
    }

    pub fn saved(&self) -> Vec<(PathBuf, FileType)> {
        self.saved.clone()
    }

    pub fn fail_saves(&mut self) {
        self.fail_saves = true;
    }

    fn get(&self, name: &str) -> Result<&String, AppError> {
        self.buffers.get(name).ok_or_else(|| AppError::BufferNotFound(name.to_string()))
    }

    pub fn create(&mut self, name: &str, content: String) {
        self.created.push(name.to_string());
        self.buffers.insert(name.to_string(), content);
    }
}

impl ImageWorkspace for FakeWorkspace {
    fn has_buffer(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    fn buffer_names(&self) -> Vec<String> {
        self.buffers.keys().cloned().collect()
    }

    fn open_file(&mut self, path: &Path) -> Result<String, AppError> {
        let content = fs::read_to_string(path)?;
        let stem = path.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
        let name = unique_buffer_name(&buffer_name_from_stem(&stem), |n| self.has_buffer(n));
        self.create(&name, content);
        Ok(name)
    }

    fn duplicate(&mut self, source: &str, name: &str) -> Result<(), AppError> {
        let content = self.get(source)?.clone();
        self.create(name, content);
        Ok(())
    }

    fn assign(&mut self, source: &str, target: &str) -> Result<(), AppError> {
        let content = self.get(source)?.clone();
        self.get(target)?;
        self.buffers.insert(target.to_string(), content);
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), AppError> {
        self.buffers.remove(name).map(|_| ()).ok_or_else(|| AppError::BufferNotFound(name.to_string()))
    }

    fn save(&mut self, name: &str, path: &Path, file_type: FileType) -> Result<(), AppError> {
        self.get(name)?;
        if self.fail_saves {
            return Err(AppError::SaveFailed {
                buffer: name.to_string(),
                path: path.to_path_buf(),
                details: "disk full".to_string(),
            });
        }
        self.saved.push((path.to_path_buf(), file_type));
        Ok(())
    }
}
