use crate::domain::AppError;
use crate::domain::pipeline::{EnhancementParams, ExtractionOptions, SmoothingParams};

use super::ImageWorkspace;

/// Buffers produced by the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The extracted component (the stars).
    pub component: String,
    /// What remains once the component is removed.
    pub residual: String,
}

/// Port for the opaque image transforms run on every item.
pub trait StageOperators<W: ImageWorkspace> {
    /// Split `buffer` into a component and a residual buffer.
    fn extract_component(
        &self,
        workspace: &mut W,
        buffer: &str,
        options: &ExtractionOptions,
    ) -> Result<Extraction, AppError>;

    /// Sharpen `buffer` in place.
    fn enhance(
        &self,
        workspace: &mut W,
        buffer: &str,
        params: &EnhancementParams,
    ) -> Result<(), AppError>;

    /// Convolve `buffer` in place.
    fn smooth(&self, workspace: &mut W, buffer: &str, params: &SmoothingParams)
    -> Result<(), AppError>;

    /// Recombine `component` into `residual`, leaving the result in `residual`.
    fn blend(&self, workspace: &mut W, residual: &str, component: &str) -> Result<(), AppError>;
}
