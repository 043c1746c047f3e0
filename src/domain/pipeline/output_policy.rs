//! Where results are written and how failures are handled.

use std::fmt;

use crate::domain::settings::{
    ConfigObject, PropertyDescriptor, PropertyValue, SemanticType, SettingsScope,
};

use super::SETTINGS_MODULE;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    Tiff,
    Xisf,
    Fits,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Tiff, FileType::Xisf, FileType::Fits];

    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Tiff => ".tiff",
            FileType::Xisf => ".xisf",
            FileType::Fits => ".fits",
        }
    }

    pub fn code(self) -> i64 {
        match self {
            FileType::Tiff => 0,
            FileType::Xisf => 1,
            FileType::Fits => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|file_type| file_type.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim_start_matches('.').to_lowercase().as_str() {
            "tiff" | "tif" => Some(FileType::Tiff),
            "xisf" => Some(FileType::Xisf),
            "fits" | "fit" | "fts" => Some(FileType::Fits),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension()[1..])
    }
}

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Record the failure and move on.
    Continue,
    /// Record the failure and stop the run.
    Abort,
    /// Let the user decide.
    #[default]
    Ask,
}

impl ErrorPolicy {
    pub const ALL: [ErrorPolicy; 3] = [ErrorPolicy::Continue, ErrorPolicy::Abort, ErrorPolicy::Ask];

    pub fn code(self) -> i64 {
        match self {
            ErrorPolicy::Continue => 0,
            ErrorPolicy::Abort => 1,
            ErrorPolicy::Ask => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|policy| policy.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "continue" => Some(ErrorPolicy::Continue),
            "abort" => Some(ErrorPolicy::Abort),
            "ask" => Some(ErrorPolicy::Ask),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Continue => f.write_str("continue"),
            ErrorPolicy::Abort => f.write_str("abort"),
            ErrorPolicy::Ask => f.write_str("ask"),
        }
    }
}

/// Output location, format and failure handling for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPolicy {
    pub(crate) scope: SettingsScope,
    /// Write results over the input files.
    pub overwrite: bool,
    /// Directory for results; `None` writes next to each input.
    pub output_dir: Option<String>,
    pub suffix: String,
    pub file_type: FileType,
    pub error_policy: ErrorPolicy,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            scope: SettingsScope::new(SETTINGS_MODULE, Some("output")),
            overwrite: true,
            output_dir: None,
            suffix: "_corrected".to_string(),
            file_type: FileType::Tiff,
            error_policy: ErrorPolicy::Ask,
        }
    }
}

impl OutputPolicy {
    /// The configured output directory, ignoring blank values.
    pub fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref().map(str::trim).filter(|dir| !dir.is_empty())
    }
}

static OUTPUT_POLICY_SCHEMA: [PropertyDescriptor<OutputPolicy>; 5] = [
    PropertyDescriptor::value(
        "overwrite",
        SemanticType::Boolean,
        |p: &OutputPolicy| Some(PropertyValue::Boolean(p.overwrite)),
        |p: &mut OutputPolicy, v| v.into_bool().map(|value| p.overwrite = value).is_some(),
    ),
    PropertyDescriptor::value(
        "output_dir",
        SemanticType::Text,
        |p: &OutputPolicy| p.output_dir().map(|dir| PropertyValue::Text(dir.to_string())),
        |p: &mut OutputPolicy, v| {
            v.into_text().map(|dir| p.output_dir = Some(dir).filter(|d| !d.trim().is_empty())).is_some()
        },
    ),
    PropertyDescriptor::value(
        "suffix",
        SemanticType::Text,
        |p: &OutputPolicy| Some(PropertyValue::Text(p.suffix.clone())),
        |p: &mut OutputPolicy, v| v.into_text().map(|value| p.suffix = value.trim().to_string()).is_some(),
    ),
    PropertyDescriptor::value(
        "file_type",
        SemanticType::Integer,
        |p: &OutputPolicy| Some(PropertyValue::Integer(p.file_type.code())),
        |p: &mut OutputPolicy, v| {
            v.into_integer().and_then(FileType::from_code).map(|value| p.file_type = value).is_some()
        },
    ),
    PropertyDescriptor::value(
        "error_policy",
        SemanticType::Integer,
        |p: &OutputPolicy| Some(PropertyValue::Integer(p.error_policy.code())),
        |p: &mut OutputPolicy, v| {
            v.into_integer()
                .and_then(ErrorPolicy::from_code)
                .map(|value| p.error_policy = value)
                .is_some()
        },
    ),
];

impl ConfigObject for OutputPolicy {
    fn scope(&self) -> &SettingsScope {
        &self.scope
    }

    fn schema() -> &'static [PropertyDescriptor<Self>] {
        &OUTPUT_POLICY_SCHEMA
    }
}
