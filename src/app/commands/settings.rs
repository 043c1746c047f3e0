use std::path::Path;

use crate::adapters::InvocationParameters;
use crate::domain::AppError;
use crate::domain::pipeline::EngineSettings;
use crate::domain::settings::{Persistable, SettingEntry};
use crate::ports::SettingsStore;

use super::overrides::SettingsOverrides;

/// Settings as stored, with declared defaults for anything missing.
pub fn load(store: &dyn SettingsStore) -> EngineSettings {
    let mut settings = EngineSettings::default();
    settings.load_from_durable_store(store);
    settings
}

pub fn show(store: &dyn SettingsStore) -> Vec<SettingEntry> {
    load(store).describe()
}

/// Apply `overrides` to the stored settings and persist the result.
pub fn set(
    store: &mut dyn SettingsStore,
    overrides: &SettingsOverrides,
) -> Result<EngineSettings, AppError> {
    let mut settings = load(store);
    overrides.apply(&mut settings)?;
    settings.save_to_durable_store(store)?;
    store.flush()?;
    Ok(settings)
}

/// Forget every stored value.
pub fn reset(store: &mut dyn SettingsStore) -> Result<(), AppError> {
    EngineSettings::default().delete_all(store)?;
    store.flush()
}

/// Write the stored settings as an invocation parameter file.
pub fn export(store: &dyn SettingsStore, path: &Path) -> Result<InvocationParameters, AppError> {
    let mut params = InvocationParameters::new();
    load(store).save_to_invocation_parameters(&mut params)?;
    params.write(path)?;
    Ok(params)
}
