//! External commands configured in `operators.toml`.
//!
//! ```toml
//! [extract]
//! program = "starnet"
//! args = ["{{ input }}", "{{ component }}", "{{ residual }}"]
//! ```

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Deserialize;
use tracing::debug;

use crate::domain::AppError;

/// One external program and its templated argument list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Commands for each stage operator plus the optional format converter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorsConfig {
    pub extract: Option<CommandSpec>,
    pub enhance: Option<CommandSpec>,
    pub smooth: Option<CommandSpec>,
    pub blend: Option<CommandSpec>,
    pub convert: Option<CommandSpec>,
}

impl OperatorsConfig {
    /// Load from `path`; a missing file leaves every operator unconfigured.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    })
}

impl CommandSpec {
    /// Render every argument against `context`.
    pub fn render_args(&self, operator: &str, context: &Value) -> Result<Vec<String>, AppError> {
        self.args
            .iter()
            .map(|arg| {
                environment().render_str(arg, context).map_err(|e| AppError::TemplateRender {
                    operator: operator.to_string(),
                    details: e.to_string(),
                })
            })
            .collect()
    }

    /// Render the arguments and run the program to completion.
    pub fn run(&self, operator: &str, context: &Value) -> Result<(), AppError> {
        let args = self.render_args(operator, context)?;
        debug!(operator, program = %self.program, ?args, "running operator");

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            AppError::OperatorFailed {
                operator: operator.to_string(),
                details: format!("{}: {}", self.program, e),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AppError::OperatorFailed {
                operator: operator.to_string(),
                details: if stderr.is_empty() { output.status.to_string() } else { stderr },
            });
        }
        Ok(())
    }
}
