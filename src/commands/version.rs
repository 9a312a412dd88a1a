use super::Session;
use crate::output;
use anyhow::{Context, Result};
use semver::VersionReq;
use tfexec::parser::version_matches;

pub struct VersionCommand;

impl VersionCommand {
    /// Print the terraform version, optionally failing when it does not meet `require`
    pub async fn execute(session: &Session, require: Option<&str>) -> Result<()> {
        let version = session
            .cli
            .version(&session.ctx)
            .await
            .context("Failed to get terraform version")?;
        output::data(&version.to_string());

        if let Some(require) = require {
            let req = VersionReq::parse(require)
                .with_context(|| format!("Invalid version requirement: {}", require))?;
            if !version_matches(&req, &version) {
                anyhow::bail!("terraform {} does not satisfy {}", version, req);
            }
            output::success(&format!("terraform {} satisfies {}", version, req));
        }

        Ok(())
    }
}
