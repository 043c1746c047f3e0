use std::path::PathBuf;

use clap::Subcommand;

use crate::adapters::TerminalConfirmer;
use crate::app::api;
use crate::domain::AppError;
use crate::ports::{Confirmation, Confirmer};

use super::overrides::OverrideArgs;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print every stored setting
    Show,
    /// Change settings without running
    Set {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Restore every setting to its default
    Reset {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Write the settings as a parameter file for `run --params`
    Export { path: PathBuf },
}

pub fn run_settings(command: SettingsCommands) -> Result<(), AppError> {
    match command {
        SettingsCommands::Show => {
            for entry in api::settings_show()? {
                match entry.value {
                    Some(value) => println!("{} = {}", entry.key, value),
                    None => println!("{} (unset)", entry.key),
                }
            }
        }
        SettingsCommands::Set { overrides } => {
            api::settings_set(&overrides.into())?;
            println!("✅ Settings saved");
        }
        SettingsCommands::Reset { yes } => {
            if !yes
                && TerminalConfirmer.confirm("Reset all settings to their defaults?")?
                    == Confirmation::No
            {
                println!("Reset cancelled");
                return Ok(());
            }
            api::settings_reset()?;
            println!("✅ Settings reset to defaults");
        }
        SettingsCommands::Export { path } => {
            let params = api::settings_export(&path)?;
            println!("✅ Exported {} parameters to {}", params.len(), path.display());
        }
    }
    Ok(())
}
