use crate::domain::AppError;
use crate::domain::pipeline::{EnhancementParams, ExtractionOptions, SmoothingParams};
use crate::ports::{Extraction, ImageWorkspace, StageOperators};

use super::FakeWorkspace;

#[derive(Debug, Clone, Default, PartialEq)]
enum Failure {
    #[default]
    None,
    /// Extraction fails when the working buffer holds this content.
    ExtractionOn(String),
    Enhancement,
    /// Extraction reports a component buffer it never created.
    PhantomComponent,
}

/// Operators that wrap buffer content in the name of each stage.
#[derive(Debug, Clone, Default)]
pub struct FakeOperators {
    failure: Failure,
}

#[allow(dead_code)]
impl FakeOperators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_extraction_on(content: &str) -> Self {
        Self { failure: Failure::ExtractionOn(content.to_string()) }
    }

    pub fn failing_enhancement() -> Self {
        Self { failure: Failure::Enhancement }
    }

    pub fn phantom_component() -> Self {
        Self { failure: Failure::PhantomComponent }
    }
}

fn operator_failed(operator: &str) -> AppError {
    AppError::OperatorFailed { operator: operator.to_string(), details: "scripted failure".to_string() }
}

fn wrap(workspace: &mut FakeWorkspace, buffer: &str, stage: &str) -> Result<(), AppError> {
    let content = workspace.content(buffer).ok_or_else(|| AppError::BufferNotFound(buffer.to_string()))?;
    workspace.insert(buffer, &format!("{stage}({content})"));
    Ok(())
}

impl StageOperators<FakeWorkspace> for FakeOperators {
    fn extract_component(
        &self,
        workspace: &mut FakeWorkspace,
        buffer: &str,
        _options: &ExtractionOptions,
    ) -> Result<Extraction, AppError> {
        let content = workspace.content(buffer).ok_or_else(|| AppError::BufferNotFound(buffer.to_string()))?;
        if self.failure == Failure::ExtractionOn(content.clone()) {
            return Err(operator_failed("extract"));
        }

        let component = format!("{buffer}_stars");
        let residual = format!("{buffer}_starless");
        if self.failure != Failure::PhantomComponent {
            workspace.create(&component, format!("component({content})"));
        }
        workspace.create(&residual, format!("residual({content})"));
        Ok(Extraction { component, residual })
    }

    fn enhance(
        &self,
        workspace: &mut FakeWorkspace,
        buffer: &str,
        _params: &EnhancementParams,
    ) -> Result<(), AppError> {
        if self.failure == Failure::Enhancement {
            return Err(operator_failed("enhance"));
        }
        wrap(workspace, buffer, "enhance")
    }

    fn smooth(
        &self,
        workspace: &mut FakeWorkspace,
        buffer: &str,
        _params: &SmoothingParams,
    ) -> Result<(), AppError> {
        wrap(workspace, buffer, "smooth")
    }

    fn blend(
        &self,
        workspace: &mut FakeWorkspace,
        residual: &str,
        component: &str,
    ) -> Result<(), AppError> {
        if !workspace.has_buffer(component) {
            return Err(AppError::BufferNotFound(component.to_string()));
        }
        let residual_content =
            workspace.content(residual).ok_or_else(|| AppError::BufferNotFound(residual.to_string()))?;
        let component_content = workspace.content(component).unwrap_or_default();
        workspace.insert(residual, &format!("blend({residual_content}, {component_content})"));
        Ok(())
    }
}
