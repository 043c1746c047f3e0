//! Parameters of the fixed stage sequence.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

pub const SHARPEN_RANGE: (f64, f64) = (0.0, 0.70);
pub const HALO_ADJUST_RANGE: (f64, f64) = (-0.50, 0.50);
pub const PSF_SIZE_RANGE: (f64, f64) = (0.0, 10.0);
pub const PSF_SHAPE_RANGE: (f64, f64) = (0.25, 6.0);
pub const OVERLAP_RANGE: (f64, f64) = (0.0, 1.0);

/// Options passed to the component extraction operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Undo a screen blend when separating the component.
    pub unscreen: bool,
    /// Tile overlap fraction used by the extractor.
    pub overlap: f64,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self { unscreen: true, overlap: 0.20 }
    }
}

/// Deconvolution applied to the extracted component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementParams {
    pub sharpen: f64,
    pub halo_adjust: f64,
}

/// Convolution applied to the component after enhancement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub psf_size: f64,
    pub psf_shape: f64,
}

/// The full stage sequence run on every item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagePlan {
    pub extraction: ExtractionOptions,
    pub enhancement: EnhancementParams,
    /// `None` skips the smoothing stage.
    pub smoothing: Option<SmoothingParams>,
}

impl StagePlan {
    pub fn validate(&self) -> Result<(), AppError> {
        check_range("overlap", self.extraction.overlap, OVERLAP_RANGE)?;
        check_range("sharpen", self.enhancement.sharpen, SHARPEN_RANGE)?;
        check_range("halo_adjust", self.enhancement.halo_adjust, HALO_ADJUST_RANGE)?;
        if let Some(smoothing) = &self.smoothing {
            check_range("psf_size", smoothing.psf_size, PSF_SIZE_RANGE)?;
            check_range("psf_shape", smoothing.psf_shape, PSF_SHAPE_RANGE)?;
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), AppError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(AppError::ParameterOutOfRange { name, value, min, max })
    }
}
