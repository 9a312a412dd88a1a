//! Parser for `terraform version` output

use crate::error::{Result, TfExecError};
use lazy_static::lazy_static;
use regex::Regex;
use semver::{Version, VersionReq};

lazy_static! {
    // Terraform v0.12.28
    // OpenTofu v1.6.0-rc1
    // Terraform v1.5.7 (dev build)
    static ref VERSION_LINE: Regex =
        Regex::new(r"(?i)^\s*(?:terraform|opentofu)\s+v(\S+)").unwrap();
}

/// Parse the version from the first line of `terraform version` stdout.
///
/// Everything after the first line (platform, providers, update notices) is ignored.
pub fn parse_version(stdout: &str) -> Result<Version> {
    let first_line = stdout.lines().next().unwrap_or_default();

    let caps = VERSION_LINE
        .captures(first_line)
        .ok_or_else(|| TfExecError::parse("no version found on the first line", stdout))?;

    Version::parse(&caps[1])
        .map_err(|e| TfExecError::parse(format!("invalid version {:?}: {}", &caps[1], e), stdout))
}

/// Drop the pre-release part of a version: `1.6.0-rc1` becomes `1.6.0`.
///
/// Versions without a pre-release are returned unchanged.
pub fn truncate_prerelease(version: &Version) -> Version {
    if version.pre.is_empty() {
        return version.clone();
    }
    Version::new(version.major, version.minor, version.patch)
}

/// Whether `version` meets `req`, comparing pre-releases as their release
pub fn version_matches(req: &VersionReq, version: &Version) -> bool {
    req.matches(&truncate_prerelease(version))
}
