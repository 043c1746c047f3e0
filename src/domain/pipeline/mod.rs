//! Batch pipeline value types: items, stages, output policy and reports.

mod buffer_names;
mod engine_settings;
mod file_item;
mod output_policy;
mod path_resolver;
mod report;
mod stages;

/// Durable settings module shared by every object of the tool.
pub const SETTINGS_MODULE: &str = "BatchStellarCorrection";

pub use buffer_names::{buffer_name_from_stem, unique_buffer_name};
pub use engine_settings::EngineSettings;
pub use file_item::{BUFFER_PREFIX, FileItem};
pub use output_policy::{ErrorPolicy, FileType, OutputPolicy};
pub use path_resolver::{OutputTarget, output_path, resolve_output};
pub use report::{Destination, ItemFailure, ItemOutput, RunReport};
pub use stages::{
    EnhancementParams, ExtractionOptions, HALO_ADJUST_RANGE, PSF_SHAPE_RANGE, PSF_SIZE_RANGE,
    SHARPEN_RANGE, SmoothingParams, StagePlan,
};
