//! Locations of the files bsc keeps between runs.

use std::env;
use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Root directory holding durable settings, operator commands and the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$BSC_HOME` when set, otherwise `$HOME/.config/bsc`.
    pub fn from_env() -> Result<Self, AppError> {
        if let Some(root) = env::var_os("BSC_HOME").filter(|value| !value.is_empty()) {
            return Ok(Self::with_root(root));
        }
        let home = env::var("HOME")
            .map_err(|_| AppError::config_error("Neither BSC_HOME nor HOME is set"))?;
        Ok(Self::with_root(PathBuf::from(home).join(".config").join("bsc")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.toml")
    }

    pub fn operators_file(&self) -> PathBuf {
        self.root.join("operators.toml")
    }

    /// Default directory of the image session.
    pub fn session_dir(&self) -> PathBuf {
        self.root.join("session")
    }
}
