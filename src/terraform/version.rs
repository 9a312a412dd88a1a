use super::{CommandArgs, TerraformCli};
use crate::context::ExecContext;
use crate::error::Result;
use crate::parser::{parse_version, version_matches};
use semver::{Version, VersionReq};

impl TerraformCli {
    /// `terraform version`
    pub async fn version(&self, ctx: &ExecContext) -> Result<Version> {
        let stdout = self.run(ctx, CommandArgs::new(["version"])).await?;
        parse_version(&stdout)
    }

    /// Check the installed version against a requirement.
    ///
    /// Pre-releases are compared as their release, so `1.6.0-rc1` satisfies `>= 1.6`.
    pub async fn version_satisfies(&self, ctx: &ExecContext, req: &VersionReq) -> Result<bool> {
        let version = self.version(ctx).await?;
        Ok(version_matches(req, &version))
    }
}
