use std::fs;
use std::path::Path;

use minijinja::{Value, context};

use crate::domain::AppError;
use crate::domain::pipeline::{EnhancementParams, ExtractionOptions, SmoothingParams};
use crate::ports::{Extraction, StageOperators};

use super::filesystem_workspace::{FilesystemWorkspace, extension_of};
use super::operator_command::{CommandSpec, OperatorsConfig};

/// Stage operators run as external programs over session files.
///
/// In-place operators write to a staging file that then replaces the buffer.
#[derive(Debug, Clone)]
pub struct CommandOperators {
    config: OperatorsConfig,
}

impl CommandOperators {
    pub fn new(config: OperatorsConfig) -> Self {
        Self { config }
    }

    fn command(&self, operator: &str) -> Result<&CommandSpec, AppError> {
        let spec = match operator {
            "extract" => &self.config.extract,
            "enhance" => &self.config.enhance,
            "smooth" => &self.config.smooth,
            "blend" => &self.config.blend,
            _ => &None,
        };
        spec.as_ref().ok_or_else(|| AppError::OperatorNotConfigured(operator.to_string()))
    }

    /// Run `operator` with `output` pointing at a staging file, then move the
    /// result over `buffer`.
    fn run_in_place(
        &self,
        operator: &str,
        workspace: &FilesystemWorkspace,
        buffer: &str,
        extra: Value,
    ) -> Result<(), AppError> {
        let command = self.command(operator)?;
        let input = workspace.buffer_path(buffer)?;
        let staging = workspace.staging_path(buffer, &extension_of(&input));
        let ctx = context! {
            input => input.to_string_lossy(),
            output => staging.to_string_lossy(),
            ..extra
        };

        let result = command.run(operator, &ctx).and_then(|()| {
            expect_output(operator, &staging)?;
            fs::rename(&staging, &input)?;
            Ok(())
        });
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }
}

fn expect_output(operator: &str, path: &Path) -> Result<(), AppError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::OperatorFailed {
            operator: operator.to_string(),
            details: format!("expected output {} was not written", path.display()),
        })
    }
}

impl StageOperators<FilesystemWorkspace> for CommandOperators {
    fn extract_component(
        &self,
        workspace: &mut FilesystemWorkspace,
        buffer: &str,
        options: &ExtractionOptions,
    ) -> Result<Extraction, AppError> {
        let command = self.command("extract")?;
        let input = workspace.buffer_path(buffer)?;
        let ext = extension_of(&input);
        let component = workspace.unique_name(&format!("{buffer}_stars"));
        let residual = workspace.unique_name(&format!("{buffer}_starless"));
        let component_path = workspace.path_for(&component, &ext);
        let residual_path = workspace.path_for(&residual, &ext);

        let ctx = context! {
            input => input.to_string_lossy(),
            component => component_path.to_string_lossy(),
            residual => residual_path.to_string_lossy(),
            unscreen => options.unscreen,
            overlap => options.overlap,
        };
        let result = command.run("extract", &ctx).and_then(|()| {
            expect_output("extract", &component_path)?;
            expect_output("extract", &residual_path)
        });
        if let Err(err) = result {
            let _ = fs::remove_file(&component_path);
            let _ = fs::remove_file(&residual_path);
            return Err(err);
        }
        Ok(Extraction { component, residual })
    }

    fn enhance(
        &self,
        workspace: &mut FilesystemWorkspace,
        buffer: &str,
        params: &EnhancementParams,
    ) -> Result<(), AppError> {
        self.run_in_place(
            "enhance",
            workspace,
            buffer,
            context! { sharpen => params.sharpen, halo_adjust => params.halo_adjust },
        )
    }

    fn smooth(
        &self,
        workspace: &mut FilesystemWorkspace,
        buffer: &str,
        params: &SmoothingParams,
    ) -> Result<(), AppError> {
        self.run_in_place(
            "smooth",
            workspace,
            buffer,
            context! { psf_size => params.psf_size, psf_shape => params.psf_shape },
        )
    }

    fn blend(
        &self,
        workspace: &mut FilesystemWorkspace,
        residual: &str,
        component: &str,
    ) -> Result<(), AppError> {
        let component_path = workspace.buffer_path(component)?;
        self.run_in_place(
            "blend",
            workspace,
            residual,
            context! { component => component_path.to_string_lossy() },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ImageWorkspace;
    use assert_fs::prelude::*;

    fn copy_command(args: &[&str]) -> Option<CommandSpec> {
        Some(CommandSpec {
            program: "cp".to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        })
    }

    fn session_with(content: &str) -> (assert_fs::TempDir, FilesystemWorkspace, String) {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("m31.fits").write_str(content).unwrap();
        let mut workspace = FilesystemWorkspace::open(temp.path().join("session")).unwrap();
        let buffer = workspace.open_file(&temp.path().join("m31.fits")).unwrap();
        (temp, workspace, buffer)
    }

    #[test]
    fn unconfigured_operator_is_reported() {
        let (_temp, mut workspace, buffer) = session_with("x");
        let operators = CommandOperators::new(OperatorsConfig::default());
        let err = operators
            .enhance(&mut workspace, &buffer, &EnhancementParams { sharpen: 0.1, halo_adjust: 0.0 })
            .unwrap_err();
        assert!(matches!(err, AppError::OperatorNotConfigured(ref name) if name == "enhance"));
    }

    #[cfg(unix)]
    #[test]
    fn extraction_registers_both_outputs() {
        let (_temp, mut workspace, buffer) = session_with("x");
        let operators = CommandOperators::new(OperatorsConfig {
            extract: Some(CommandSpec {
                program: "sh".to_string(),
                args: vec![
                    "-c".to_string(),
                    "cp \"$0\" \"$1\" && cp \"$0\" \"$2\"".to_string(),
                    "{{ input }}".to_string(),
                    "{{ component }}".to_string(),
                    "{{ residual }}".to_string(),
                ],
            }),
            ..OperatorsConfig::default()
        });

        let extraction =
            operators.extract_component(&mut workspace, &buffer, &ExtractionOptions::default()).unwrap();
        assert_eq!(extraction.component, "m31_stars");
        assert_eq!(extraction.residual, "m31_starless");
        assert!(workspace.has_buffer(&extraction.component));
        assert!(workspace.has_buffer(&extraction.residual));
    }

    #[cfg(unix)]
    #[test]
    fn in_place_operator_replaces_buffer_content() {
        let (temp, mut workspace, buffer) = session_with("before");
        temp.child("after.fits").write_str("after").unwrap();
        let after = temp.path().join("after.fits");
        let operators = CommandOperators::new(OperatorsConfig {
            smooth: copy_command(&[after.to_str().unwrap(), "{{ output }}"]),
            ..OperatorsConfig::default()
        });

        operators
            .smooth(&mut workspace, &buffer, &SmoothingParams { psf_size: 0.75, psf_shape: 1.0 })
            .unwrap();
        let path = workspace.buffer_path(&buffer).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "after");
        assert_eq!(workspace.buffer_names(), vec![buffer]);
    }

    #[cfg(unix)]
    #[test]
    fn missing_output_fails_without_leaving_buffers() {
        let (_temp, mut workspace, buffer) = session_with("x");
        let operators = CommandOperators::new(OperatorsConfig {
            extract: Some(CommandSpec { program: "true".to_string(), args: Vec::new() }),
            ..OperatorsConfig::default()
        });

        let err = operators
            .extract_component(&mut workspace, &buffer, &ExtractionOptions::default())
            .unwrap_err();
        assert!(matches!(err, AppError::OperatorFailed { .. }));
        assert_eq!(workspace.buffer_names(), vec![buffer]);
    }
}
