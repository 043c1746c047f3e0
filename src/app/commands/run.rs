use std::path::PathBuf;

use tracing::info;

use crate::adapters::InvocationParameters;
use crate::app::{AppContext, engine};
use crate::domain::pipeline::{EngineSettings, RunReport};
use crate::domain::settings::Persistable;
use crate::domain::AppError;
use crate::ports::{Confirmer, ImageWorkspace, SettingsStore, StageOperators};

use super::files::parse_item;
use super::overrides::SettingsOverrides;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Items replacing the stored file list for this run.
    pub items: Vec<String>,
    pub overrides: SettingsOverrides,
    /// Take the configuration from this parameter file instead of the store.
    pub params: Option<PathBuf>,
    /// Also write the final configuration to this parameter file.
    pub save_params: Option<PathBuf>,
    pub non_interactive: bool,
}

impl RunOptions {
    /// Interactive runs persist their configuration and may ask questions.
    pub fn is_interactive(&self) -> bool {
        self.params.is_none() && !self.non_interactive
    }
}

/// Gather the run configuration and persist it where the mode asks for it.
pub fn prepare(
    store: &mut dyn SettingsStore,
    options: &RunOptions,
) -> Result<EngineSettings, AppError> {
    let mut settings = EngineSettings::default();
    match &options.params {
        Some(path) => {
            info!(path = %path.display(), "loading invocation parameters");
            settings.load_from_invocation_parameters(&InvocationParameters::read(path)?);
        }
        None => settings.load_from_durable_store(store),
    }

    if !options.items.is_empty() {
        settings.files =
            options.items.iter().map(|entry| parse_item(entry)).collect::<Result<_, _>>()?;
    }
    options.overrides.apply(&mut settings)?;
    settings.validate()?;

    if options.is_interactive() {
        settings.save_to_durable_store(store)?;
        store.flush()?;
    }
    if let Some(path) = &options.save_params {
        let mut params = InvocationParameters::new();
        settings.save_to_invocation_parameters(&mut params)?;
        params.write(path)?;
    }
    Ok(settings)
}

/// Run the engine over the configured file list.
pub fn execute<W, O, C>(ctx: &mut AppContext<W, O, C>, settings: &EngineSettings) -> RunReport
where
    W: ImageWorkspace,
    O: StageOperators<W>,
    C: Confirmer,
{
    engine::execute(ctx, &settings.files, &settings.stage_plan(), &settings.output)
}
