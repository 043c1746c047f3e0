//! Output path computation.
//!
//! Resolution is pure: existence is supplied by the caller, and a collision is
//! returned as [`OutputTarget::Conflict`] for the engine to act on.

use std::path::{Path, PathBuf};

use super::output_policy::OutputPolicy;

/// Destination of a file item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Nothing stands in the way of writing here.
    Clear(PathBuf),
    /// A file already exists here and overwriting was not requested.
    Conflict(PathBuf),
}

/// Compute where the result for `input` is written.
///
/// With `overwrite` the input itself is the target; otherwise the result goes
/// to `output_dir` (or the input's directory) as `<stem><suffix><extension>`.
pub fn output_path(input: &Path, policy: &OutputPolicy) -> PathBuf {
    if policy.overwrite {
        return input.to_path_buf();
    }

    let directory = match policy.output_dir() {
        Some(dir) => PathBuf::from(dir),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem = input.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
    directory.join(format!("{}{}{}", stem, policy.suffix, policy.file_type.extension()))
}

/// Compute the output path and flag a collision with an existing file.
pub fn resolve_output(
    input: &Path,
    policy: &OutputPolicy,
    exists: impl Fn(&Path) -> bool,
) -> OutputTarget {
    let path = output_path(input, policy);
    if !policy.overwrite && exists(&path) {
        OutputTarget::Conflict(path)
    } else {
        OutputTarget::Clear(path)
    }
}
