use std::path::PathBuf;

use clap::Args;

use crate::app::api::{self, RunOptions};
use crate::domain::AppError;

use super::overrides::OverrideArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Files or `window:NAME` buffers to process instead of the stored list
    items: Vec<String>,
    #[command(flatten)]
    overrides: OverrideArgs,
    /// Read the configuration from a parameter file; nothing is saved
    #[arg(long)]
    params: Option<PathBuf>,
    /// Write the run configuration to a parameter file
    #[arg(long)]
    save_params: Option<PathBuf>,
    /// Do not save settings and answer every question with no
    #[arg(long)]
    non_interactive: bool,
    /// Session directory holding open buffers
    #[arg(long)]
    session: Option<PathBuf>,
}

/// Returns the process exit code.
pub fn run_batch(args: RunArgs) -> Result<i32, AppError> {
    let options = RunOptions {
        items: args.items,
        overrides: args.overrides.into(),
        params: args.params,
        save_params: args.save_params,
        non_interactive: args.non_interactive,
    };

    let report = api::run(options, args.session)?;
    for output in &report.outputs {
        println!("✅ {} -> {}", output.item, output.destination);
    }
    println!("{}", report.summary());
    Ok(if report.is_success() { 0 } else { 1 })
}
