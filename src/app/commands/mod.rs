pub mod files;
pub mod overrides;
pub mod run;
pub mod settings;
