//! API facade wiring adapters from the environment to the commands.

use std::path::{Path, PathBuf};

use crate::adapters::{
    CommandOperators, FilesystemWorkspace, InvocationParameters, NonInteractiveConfirmer,
    OperatorsConfig, TerminalConfirmer, TomlSettingsStore,
};
use crate::app::AppContext;
use crate::app::commands::{files, run, settings};
use crate::app::config::AppPaths;
use crate::domain::pipeline::{EngineSettings, RunReport};
use crate::domain::settings::SettingEntry;
use crate::ports::Confirmer;

pub use crate::app::commands::files::{FilesAction, FilesOutcome};
pub use crate::app::commands::overrides::SettingsOverrides;
pub use crate::app::commands::run::RunOptions;
pub use crate::domain::AppError;

fn open_store(paths: &AppPaths) -> Result<TomlSettingsStore, AppError> {
    TomlSettingsStore::open(paths.settings_file())
}

/// Prepare and execute a batch run.
///
/// `session` overrides the default session directory.
pub fn run(options: RunOptions, session: Option<PathBuf>) -> Result<RunReport, AppError> {
    let paths = AppPaths::from_env()?;
    let mut store = open_store(&paths)?;
    let settings = run::prepare(&mut store, &options)?;

    let operators = OperatorsConfig::load(&paths.operators_file())?;
    let workspace = FilesystemWorkspace::open(session.unwrap_or_else(|| paths.session_dir()))?
        .with_converter(operators.convert.clone());
    let operators = CommandOperators::new(operators);

    if options.is_interactive() {
        Ok(run_with(workspace, operators, TerminalConfirmer, &settings))
    } else {
        Ok(run_with(workspace, operators, NonInteractiveConfirmer, &settings))
    }
}

fn run_with<C: Confirmer>(
    workspace: FilesystemWorkspace,
    operators: CommandOperators,
    confirmer: C,
    settings: &EngineSettings,
) -> RunReport {
    let mut ctx = AppContext::new(workspace, operators, confirmer);
    run::execute(&mut ctx, settings)
}

pub fn settings_show() -> Result<Vec<SettingEntry>, AppError> {
    let store = open_store(&AppPaths::from_env()?)?;
    Ok(settings::show(&store))
}

pub fn settings_set(overrides: &SettingsOverrides) -> Result<EngineSettings, AppError> {
    let mut store = open_store(&AppPaths::from_env()?)?;
    settings::set(&mut store, overrides)
}

pub fn settings_reset() -> Result<(), AppError> {
    let mut store = open_store(&AppPaths::from_env()?)?;
    settings::reset(&mut store)
}

pub fn settings_export(path: &Path) -> Result<InvocationParameters, AppError> {
    let store = open_store(&AppPaths::from_env()?)?;
    settings::export(&store, path)
}

pub fn files(action: FilesAction) -> Result<FilesOutcome, AppError> {
    let mut store = open_store(&AppPaths::from_env()?)?;
    files::execute(&mut store, action)
}
