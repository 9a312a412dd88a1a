//! Decoders for terraform's textual stdout

pub mod version;

pub use version::{parse_version, truncate_prerelease, version_matches};

use crate::error::{Result, TfExecError};

/// One resource address per non-empty line, in output order.
///
/// Empty output gives an empty list, never an error.
pub fn parse_resource_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Current workspace name from `terraform workspace show`
pub fn parse_workspace_name(stdout: &str) -> Result<String> {
    let name = stdout.trim();
    if name.is_empty() {
        return Err(TfExecError::parse("empty workspace name", stdout));
    }
    Ok(name.to_string())
}
