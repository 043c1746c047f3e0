use std::path::PathBuf;

use clap::Subcommand;

use crate::app::api::{self, FilesAction};
use crate::domain::AppError;

#[derive(Subcommand)]
pub enum FilesCommands {
    /// Show the stored file list
    #[clap(visible_alias = "ls")]
    List,
    /// Add image files
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Add open buffers by name
    AddBuffer {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove files or `window:NAME` buffers
    #[clap(visible_alias = "rm")]
    Remove {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Empty the list
    Clear,
}

pub fn run_files(command: FilesCommands) -> Result<(), AppError> {
    let (action, verb) = match command {
        FilesCommands::List => (FilesAction::List, None),
        FilesCommands::Add { paths } => (FilesAction::Add(paths), Some("Added")),
        FilesCommands::AddBuffer { names } => (FilesAction::AddBuffers(names), Some("Added")),
        FilesCommands::Remove { items } => (FilesAction::Remove(items), Some("Removed")),
        FilesCommands::Clear => (FilesAction::Clear, Some("Removed")),
    };

    let outcome = api::files(action)?;
    if let Some(verb) = verb {
        println!("✅ {} {} item(s)", verb, outcome.changed);
    }
    if outcome.files.is_empty() {
        println!("The file list is empty");
    }
    for (index, item) in outcome.files.iter().enumerate() {
        println!("  {}. {}", index + 1, item.to_stored());
    }
    Ok(())
}
