//! Shared testing utilities for bsc CLI tests.

use assert_cmd::Command;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Operators that copy their input, so a run leaves pixels untouched.
#[allow(dead_code)]
pub const COPY_OPERATORS: &str = r#"
[extract]
program = "sh"
args = ["-c", "cp \"$0\" \"$1\" && cp \"$0\" \"$2\"", "{{ input }}", "{{ component }}", "{{ residual }}"]

[enhance]
program = "cp"
args = ["{{ input }}", "{{ output }}"]

[smooth]
program = "cp"
args = ["{{ input }}", "{{ output }}"]

[blend]
program = "cp"
args = ["{{ input }}", "{{ output }}"]
"#;

/// Isolated `$HOME` and `$BSC_HOME` for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    original_home: Option<OsString>,
    original_bsc_home: Option<OsString>,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        let original_home = env::var_os("HOME");
        let original_bsc_home = env::var_os("BSC_HOME");
        unsafe {
            env::set_var("HOME", root.path());
            env::set_var("BSC_HOME", root.path().join("bsc"));
        }

        Self { root, work_dir, original_home, original_bsc_home }
    }

    pub fn home(&self) -> &Path {
        self.root.path()
    }

    /// Directory holding settings.toml, operators.toml and the session.
    pub fn bsc_home(&self) -> PathBuf {
        self.root.path().join("bsc")
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.bsc_home().join("settings.toml")
    }

    pub fn read_settings(&self) -> String {
        fs::read_to_string(self.settings_file()).unwrap_or_default()
    }

    pub fn session_dir(&self) -> PathBuf {
        self.bsc_home().join("session")
    }

    /// Build a command for the compiled `bsc` binary inside the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("bsc").expect("Failed to locate bsc binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", self.home())
            .env("BSC_HOME", self.bsc_home())
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write_operators(&self, content: &str) {
        fs::create_dir_all(self.bsc_home()).expect("Failed to create bsc home");
        fs::write(self.bsc_home().join("operators.toml"), content)
            .expect("Failed to write operators.toml");
    }

    /// Create an image file in the work directory and return its path.
    pub fn write_image(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, content).expect("Failed to write image");
        path
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        restore("HOME", &self.original_home);
        restore("BSC_HOME", &self.original_bsc_home);
    }
}

fn restore(key: &str, value: &Option<OsString>) {
    match value {
        Some(value) => unsafe {
            env::set_var(key, value);
        },
        None => unsafe {
            env::remove_var(key);
        },
    }
}
