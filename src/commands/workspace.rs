use super::{Session, as_strs};
use crate::output;
use anyhow::{Context, Result};

pub struct WorkspaceCommand;

impl WorkspaceCommand {
    pub async fn new(session: &Session, name: &str, opts: &[String]) -> Result<()> {
        session
            .cli
            .workspace_new(&session.ctx, name, &as_strs(opts))
            .await
            .with_context(|| format!("Failed to create workspace {}", name))?;
        output::success(&format!("Created workspace {}", name));
        Ok(())
    }

    pub async fn select(session: &Session, name: &str) -> Result<()> {
        session
            .cli
            .workspace_select(&session.ctx, name)
            .await
            .with_context(|| format!("Failed to select workspace {}", name))?;
        output::success(&format!("Switched to workspace {}", name));
        Ok(())
    }

    pub async fn show(session: &Session) -> Result<()> {
        let name = session
            .cli
            .workspace_show(&session.ctx)
            .await
            .context("Failed to show workspace")?;
        output::data(&name);
        Ok(())
    }
}
