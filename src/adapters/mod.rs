mod command_operators;
mod confirmers;
mod filesystem_workspace;
mod invocation_parameters;
mod memory_settings_store;
mod operator_command;
mod toml_settings_store;

pub use command_operators::CommandOperators;
pub use confirmers::{NonInteractiveConfirmer, TerminalConfirmer};
pub use filesystem_workspace::FilesystemWorkspace;
pub use invocation_parameters::InvocationParameters;
pub use memory_settings_store::MemorySettingsStore;
pub use operator_command::{CommandSpec, OperatorsConfig};
pub use toml_settings_store::TomlSettingsStore;
