mod confirmer;
mod image_workspace;
mod parameter_store;
mod settings_store;
mod stage_operators;

pub use confirmer::{Confirmation, Confirmer};
pub use image_workspace::ImageWorkspace;
pub use parameter_store::ParameterStore;
pub use settings_store::SettingsStore;
pub use stage_operators::{Extraction, StageOperators};
