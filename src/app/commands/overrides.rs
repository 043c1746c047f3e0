use std::path::PathBuf;

use crate::domain::pipeline::{EngineSettings, ErrorPolicy, FileType};
use crate::domain::AppError;

/// Command-line changes applied on top of the loaded settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub sharpen: Option<f64>,
    pub halo_adjust: Option<f64>,
    pub psf_size: Option<f64>,
    pub psf_shape: Option<f64>,
    pub suffix: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub clear_output_dir: bool,
    pub overwrite: Option<bool>,
    pub file_type: Option<String>,
    pub error_policy: Option<String>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply every override, then check stage parameter ranges.
    pub fn apply(&self, settings: &mut EngineSettings) -> Result<(), AppError> {
        if let Some(value) = self.sharpen {
            settings.sharpen = value;
        }
        if let Some(value) = self.halo_adjust {
            settings.halo_adjust = value;
        }
        if let Some(value) = self.psf_size {
            settings.psf_size = value;
        }
        if let Some(value) = self.psf_shape {
            settings.psf_shape = value;
        }
        if let Some(suffix) = &self.suffix {
            settings.output.suffix = suffix.clone();
        }
        if self.clear_output_dir {
            settings.output.output_dir = None;
        }
        if let Some(dir) = &self.output_dir {
            settings.output.output_dir = Some(dir.to_string_lossy().into_owned());
        }
        if let Some(overwrite) = self.overwrite {
            settings.output.overwrite = overwrite;
        }
        if let Some(name) = &self.file_type {
            settings.output.file_type = FileType::from_name(name).ok_or_else(|| {
                AppError::config_error(format!(
                    "Unknown file type '{name}' (expected tiff, xisf or fits)"
                ))
            })?;
        }
        if let Some(name) = &self.error_policy {
            settings.output.error_policy = ErrorPolicy::from_name(name).ok_or_else(|| {
                AppError::config_error(format!(
                    "Unknown error policy '{name}' (expected continue, abort or ask)"
                ))
            })?;
        }
        settings.stage_plan().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_loaded_values() {
        let mut settings = EngineSettings::default();
        settings.output.output_dir = Some("/old".to_string());
        let overrides = SettingsOverrides {
            sharpen: Some(0.3),
            overwrite: Some(false),
            file_type: Some("fit".to_string()),
            error_policy: Some("Abort".to_string()),
            clear_output_dir: true,
            ..SettingsOverrides::default()
        };

        overrides.apply(&mut settings).unwrap();
        assert_eq!(settings.sharpen, 0.3);
        assert!(!settings.output.overwrite);
        assert_eq!(settings.output.file_type, FileType::Fits);
        assert_eq!(settings.output.error_policy, ErrorPolicy::Abort);
        assert_eq!(settings.output.output_dir, None);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let mut settings = EngineSettings::default();
        let overrides = SettingsOverrides { sharpen: Some(0.9), ..SettingsOverrides::default() };
        assert!(matches!(
            overrides.apply(&mut settings),
            Err(AppError::ParameterOutOfRange { name: "sharpen", .. })
        ));
    }

    #[test]
    fn unknown_file_type_is_rejected() {
        let mut settings = EngineSettings::default();
        let overrides =
            SettingsOverrides { file_type: Some("png".to_string()), ..SettingsOverrides::default() };
        assert!(overrides.apply(&mut settings).is_err());
    }
}
