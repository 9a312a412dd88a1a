use super::{Session, as_strs, read_state, write_file};
use crate::output;
use anyhow::{Context, Result};
use std::path::Path;
use tfexec::Plan;

pub struct LifecycleCommand;

impl LifecycleCommand {
    pub async fn init(session: &Session, opts: &[String]) -> Result<()> {
        session
            .cli
            .init(&session.ctx, &as_strs(opts))
            .await
            .context("terraform init failed")?;
        output::success("Initialized");
        Ok(())
    }

    /// Run plan and save the resulting plan file to `out` when given
    pub async fn plan(
        session: &Session,
        state: Option<&Path>,
        out: Option<&Path>,
        opts: &[String],
    ) -> Result<()> {
        let state = read_state(state).await?;
        let plan = session
            .cli
            .plan(&session.ctx, state.as_ref(), &as_strs(opts))
            .await
            .context("terraform plan failed")?;

        if let Some(out) = out {
            write_file(out, plan.bytes()).await?;
            output::key_value("Plan saved to", &out.display().to_string());
        }
        output::success("Plan complete");
        Ok(())
    }

    pub async fn apply(session: &Session, plan: Option<&Path>, opts: &[String]) -> Result<()> {
        let plan = match plan {
            Some(path) => Some(
                Plan::from_file(path)
                    .await
                    .with_context(|| format!("Failed to read plan file: {:?}", path))?,
            ),
            None => None,
        };

        session
            .cli
            .apply(&session.ctx, plan.as_ref(), &as_strs(opts))
            .await
            .context("terraform apply failed")?;
        output::success("Apply complete");
        Ok(())
    }

    pub async fn destroy(session: &Session, dir: Option<&str>, opts: &[String]) -> Result<()> {
        session
            .cli
            .destroy(&session.ctx, dir, &as_strs(opts))
            .await
            .context("terraform destroy failed")?;
        output::success("Destroy complete");
        Ok(())
    }
}
