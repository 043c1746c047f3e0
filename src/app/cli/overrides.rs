use std::path::PathBuf;

use clap::Args;

use crate::app::api::SettingsOverrides;

/// Settings that can be changed from the command line.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Star sharpening amount (0 to 0.70)
    #[arg(long, allow_negative_numbers = true)]
    sharpen: Option<f64>,
    /// Halo adjustment (-0.50 to 0.50)
    #[arg(long = "halo", allow_negative_numbers = true)]
    halo_adjust: Option<f64>,
    /// Convolution PSF size; 0 skips smoothing
    #[arg(long)]
    psf_size: Option<f64>,
    /// Convolution PSF shape (0.25 to 6)
    #[arg(long)]
    psf_shape: Option<f64>,
    /// Appended to the file name of each result
    #[arg(long)]
    suffix: Option<String>,
    /// Write results to this directory instead of next to each input
    #[arg(long, conflicts_with = "no_output_dir")]
    output_dir: Option<PathBuf>,
    /// Write results next to each input
    #[arg(long)]
    no_output_dir: bool,
    /// Replace the input files
    #[arg(long, conflicts_with = "no_overwrite")]
    overwrite: bool,
    /// Write new files next to the inputs
    #[arg(long)]
    no_overwrite: bool,
    /// Output format: tiff, xisf or fits
    #[arg(long)]
    file_type: Option<String>,
    /// On item failure: continue, abort or ask
    #[arg(long = "on-error")]
    error_policy: Option<String>,
}

impl From<OverrideArgs> for SettingsOverrides {
    fn from(args: OverrideArgs) -> Self {
        let overwrite = match (args.overwrite, args.no_overwrite) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        SettingsOverrides {
            sharpen: args.sharpen,
            halo_adjust: args.halo_adjust,
            psf_size: args.psf_size,
            psf_shape: args.psf_shape,
            suffix: args.suffix,
            output_dir: args.output_dir,
            clear_output_dir: args.no_output_dir,
            overwrite,
            file_type: args.file_type,
            error_policy: args.error_policy,
        }
    }
}
