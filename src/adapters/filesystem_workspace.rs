//! Image session backed by a directory.
//!
//! Every file `<name>.<ext>` directly inside the session directory is an open
//! buffer called `<name>`. Closing a buffer deletes its file.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::context;
use tracing::debug;

use crate::domain::pipeline::{buffer_name_from_stem, unique_buffer_name};
use crate::domain::{AppError, FileType};
use crate::ports::ImageWorkspace;

use super::operator_command::CommandSpec;

const STAGING_PREFIX: &str = ".";

#[derive(Debug, Clone)]
pub struct FilesystemWorkspace {
    root: PathBuf,
    converter: Option<CommandSpec>,
}

impl FilesystemWorkspace {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, converter: None })
    }

    /// Use `converter` when a buffer is saved in a format other than its own.
    pub fn with_converter(mut self, converter: Option<CommandSpec>) -> Self {
        self.converter = converter;
        self
    }

    /// File backing buffer `name`.
    pub fn buffer_path(&self, name: &str) -> Result<PathBuf, AppError> {
        self.find(name).ok_or_else(|| AppError::BufferNotFound(name.to_string()))
    }

    /// Path for a new buffer `name` stored with extension `ext`.
    pub fn path_for(&self, name: &str, ext: &str) -> PathBuf {
        if ext.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{name}.{ext}"))
        }
    }

    /// Scratch path next to the buffers that is never listed as a buffer.
    pub fn staging_path(&self, name: &str, ext: &str) -> PathBuf {
        self.path_for(&format!("{STAGING_PREFIX}{name}.partial"), ext)
    }

    /// A buffer name not currently open, derived from `base`.
    pub fn unique_name(&self, base: &str) -> String {
        let open = self.buffer_names();
        unique_buffer_name(base, |candidate| open.iter().any(|name| name == candidate))
    }

    /// Add the file at `source` to the session as buffer `name`.
    pub fn import(&mut self, source: &Path, name: &str) -> Result<(), AppError> {
        let ext = extension_of(source);
        fs::copy(source, self.path_for(name, &ext))?;
        Ok(())
    }

    fn entries(&self) -> Vec<(String, PathBuf)> {
        let Ok(read_dir) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut entries: Vec<(String, PathBuf)> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let name = path.file_stem()?.to_str()?.to_string();
                (!name.starts_with(STAGING_PREFIX)).then_some((name, path))
            })
            .collect();
        entries.sort();
        entries
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        self.entries().into_iter().find(|(candidate, _)| candidate == name).map(|(_, path)| path)
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension().and_then(|ext| ext.to_str()).unwrap_or_default().to_string()
}

impl ImageWorkspace for FilesystemWorkspace {
    fn has_buffer(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn buffer_names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    fn open_file(&mut self, path: &Path) -> Result<String, AppError> {
        if !path.is_file() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a readable file", path.display()),
            )));
        }
        let stem = path.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
        let name = self.unique_name(&buffer_name_from_stem(&stem));
        self.import(path, &name)?;
        debug!(path = %path.display(), buffer = %name, "opened file");
        Ok(name)
    }

    fn duplicate(&mut self, source: &str, name: &str) -> Result<(), AppError> {
        let source_path = self.buffer_path(source)?;
        self.import(&source_path, name)
    }

    fn assign(&mut self, source: &str, target: &str) -> Result<(), AppError> {
        let source_path = self.buffer_path(source)?;
        let target_path = self.buffer_path(target)?;
        let replacement = self.path_for(target, &extension_of(&source_path));
        fs::copy(&source_path, &replacement)?;
        if replacement != target_path {
            fs::remove_file(&target_path)?;
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), AppError> {
        let path = self.buffer_path(name)?;
        fs::remove_file(path)?;
        Ok(())
    }

    fn save(&mut self, name: &str, path: &Path, file_type: FileType) -> Result<(), AppError> {
        let source = self.buffer_path(name)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if FileType::from_name(&extension_of(&source)) == Some(file_type) {
            fs::copy(&source, path)?;
            return Ok(());
        }

        let Some(converter) = &self.converter else {
            return Err(AppError::SaveFailed {
                buffer: name.to_string(),
                path: path.to_path_buf(),
                details: format!("no converter is configured for {file_type} output"),
            });
        };
        converter.run(
            "convert",
            &context! {
                input => source.to_string_lossy(),
                output => path.to_string_lossy(),
                format => file_type.to_string(),
            },
        )?;
        if !path.is_file() {
            return Err(AppError::SaveFailed {
                buffer: name.to_string(),
                path: path.to_path_buf(),
                details: "converter did not produce the output file".to_string(),
            });
        }
        Ok(())
    }
}
