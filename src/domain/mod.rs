pub mod error;
pub mod pipeline;
pub mod settings;

pub use error::{AppError, ItemError};
pub use pipeline::{
    Destination, EngineSettings, ErrorPolicy, FileItem, FileType, OutputPolicy, RunReport,
    StagePlan,
};
