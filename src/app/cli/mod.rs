//! CLI Adapter.

mod files;
mod overrides;
mod run;
mod settings;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "bsc")]
#[command(version)]
#[command(
    about = "Batch star reduction and correction for astronomical images",
    long_about = None
)]
struct Cli {
    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the file list
    #[clap(visible_alias = "r")]
    Run(run::RunArgs),
    /// Inspect or change stored settings
    #[clap(visible_alias = "s")]
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },
    /// Manage the stored file list
    #[clap(visible_alias = "f")]
    Files {
        #[command(subcommand)]
        command: files::FilesCommands,
    },
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<i32, AppError> = match cli.command {
        Commands::Run(args) => run::run_batch(args),
        Commands::Settings { command } => settings::run_settings(command).map(|_| 0),
        Commands::Files { command } => files::run_files(command).map(|_| 0),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
