//! Persisted configuration of a batch run.

use crate::domain::AppError;
use crate::domain::settings::{
    ConfigObject, Persistable, PropertyDescriptor, PropertyValue, SemanticType, SettingsScope,
};

use super::SETTINGS_MODULE;
use super::file_item::FileItem;
use super::output_policy::OutputPolicy;
use super::stages::{EnhancementParams, ExtractionOptions, SmoothingParams, StagePlan};

/// File list, stage parameters and output policy of the batch engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    scope: SettingsScope,
    pub files: Vec<FileItem>,
    pub sharpen: f64,
    pub halo_adjust: f64,
    /// Convolution PSF size; `0` disables smoothing.
    pub psf_size: f64,
    pub psf_shape: f64,
    pub extraction: ExtractionOptions,
    pub output: OutputPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scope: SettingsScope::new(SETTINGS_MODULE, Some("engine")),
            files: Vec::new(),
            sharpen: 0.0,
            halo_adjust: 0.50,
            psf_size: 0.75,
            psf_shape: 1.0,
            extraction: ExtractionOptions::default(),
            output: OutputPolicy::default(),
        }
    }
}

impl EngineSettings {
    pub fn stage_plan(&self) -> StagePlan {
        let smoothing = (self.psf_size > 0.0)
            .then_some(SmoothingParams { psf_size: self.psf_size, psf_shape: self.psf_shape });
        StagePlan {
            extraction: self.extraction,
            enhancement: EnhancementParams { sharpen: self.sharpen, halo_adjust: self.halo_adjust },
            smoothing,
        }
    }

    /// Check that a run can start with these settings.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.files.is_empty() {
            return Err(AppError::EmptyFileList);
        }
        self.files.iter().try_for_each(FileItem::check_storable)?;
        self.stage_plan().validate()
    }

    /// Append items that are not already listed. Nothing is added when an
    /// item cannot be stored.
    pub fn add_files(&mut self, items: impl IntoIterator<Item = FileItem>) -> Result<usize, AppError> {
        let items: Vec<FileItem> = items.into_iter().collect();
        items.iter().try_for_each(FileItem::check_storable)?;
        let mut added = 0;
        for item in items {
            if !self.files.contains(&item) {
                self.files.push(item);
                added += 1;
            }
        }
        Ok(added)
    }
}

fn output_policy(settings: &EngineSettings) -> &dyn Persistable {
    &settings.output
}

fn output_policy_mut(settings: &mut EngineSettings) -> &mut dyn Persistable {
    &mut settings.output
}

static ENGINE_SCHEMA: [PropertyDescriptor<EngineSettings>; 7] = [
    PropertyDescriptor::value(
        "files",
        SemanticType::StringList,
        |s: &EngineSettings| {
            Some(PropertyValue::StringList(s.files.iter().map(FileItem::to_stored).collect()))
        },
        |s: &mut EngineSettings, v| {
            v.into_string_list()
                .map(|entries| s.files = entries.iter().filter_map(|e| FileItem::parse(e)).collect())
                .is_some()
        },
    ),
    PropertyDescriptor::value(
        "sharpen",
        SemanticType::Real,
        |s: &EngineSettings| Some(PropertyValue::Real(s.sharpen)),
        |s: &mut EngineSettings, v| v.into_real().map(|value| s.sharpen = value).is_some(),
    ),
    PropertyDescriptor::value(
        "halo_adjust",
        SemanticType::Real,
        |s: &EngineSettings| Some(PropertyValue::Real(s.halo_adjust)),
        |s: &mut EngineSettings, v| v.into_real().map(|value| s.halo_adjust = value).is_some(),
    ),
    PropertyDescriptor::value(
        "psf_size",
        SemanticType::Real,
        |s: &EngineSettings| Some(PropertyValue::Real(s.psf_size)),
        |s: &mut EngineSettings, v| v.into_real().map(|value| s.psf_size = value).is_some(),
    ),
    PropertyDescriptor::value(
        "psf_shape",
        SemanticType::Real,
        |s: &EngineSettings| Some(PropertyValue::Real(s.psf_shape)),
        |s: &mut EngineSettings, v| v.into_real().map(|value| s.psf_shape = value).is_some(),
    ),
    PropertyDescriptor::value(
        "extraction",
        SemanticType::JsonBlob,
        |s: &EngineSettings| serde_json::to_value(s.extraction).ok().map(PropertyValue::JsonBlob),
        |s: &mut EngineSettings, v| {
            v.into_json()
                .and_then(|json| serde_json::from_value(json).ok())
                .map(|options| s.extraction = options)
                .is_some()
        },
    ),
    PropertyDescriptor::nested("output", output_policy, output_policy_mut),
];

impl ConfigObject for EngineSettings {
    fn scope(&self) -> &SettingsScope {
        &self.scope
    }

    fn schema() -> &'static [PropertyDescriptor<Self>] {
        &ENGINE_SCHEMA
    }
}
