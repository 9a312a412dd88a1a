use super::{CommandArgs, TerraformCli};
use crate::context::ExecContext;
use crate::error::{Result, TfExecError};
use crate::parser::parse_workspace_name;

impl TerraformCli {
    /// `terraform workspace new [opts...] <name>`
    pub async fn workspace_new(&self, ctx: &ExecContext, name: &str, opts: &[&str]) -> Result<()> {
        validate_workspace_name(name)?;
        let args = CommandArgs::new(["workspace", "new"])
            .options(opts)
            .positional(name);
        self.run(ctx, args).await?;
        Ok(())
    }

    /// `terraform workspace select <name>`
    pub async fn workspace_select(&self, ctx: &ExecContext, name: &str) -> Result<()> {
        validate_workspace_name(name)?;
        self.run(ctx, CommandArgs::new(["workspace", "select"]).positional(name))
            .await?;
        Ok(())
    }

    /// `terraform workspace show`
    pub async fn workspace_show(&self, ctx: &ExecContext) -> Result<String> {
        let stdout = self.run(ctx, CommandArgs::new(["workspace", "show"])).await?;
        parse_workspace_name(&stdout)
    }
}

fn validate_workspace_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(TfExecError::InvalidArgument(format!(
            "invalid workspace name: {:?}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommand, MockCommandExecutor};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_workspace_new_select_show() {
        let mock = Arc::new(MockCommandExecutor::new(vec![
            MockCommand::new(["terraform", "workspace", "new", "-lock=false", "staging"]),
            MockCommand::new(["terraform", "workspace", "select", "staging"]),
            MockCommand::new(["terraform", "workspace", "show"]).stdout("staging\n"),
        ]));
        let cli = TerraformCli::new(mock.clone());
        let ctx = ExecContext::background();

        cli.workspace_new(&ctx, "staging", &["-lock=false"]).await.unwrap();
        cli.workspace_select(&ctx, "staging").await.unwrap();
        assert_eq!(cli.workspace_show(&ctx).await.unwrap(), "staging");
        mock.assert_all_consumed();
    }

    #[tokio::test]
    async fn test_workspace_name_must_not_look_like_a_flag() {
        let cli = TerraformCli::new(Arc::new(MockCommandExecutor::default()));
        let ctx = ExecContext::background();

        assert!(cli.workspace_select(&ctx, "").await.is_err());
        assert!(cli.workspace_new(&ctx, "-force", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_workspace_select_missing_workspace() {
        let mock = Arc::new(MockCommandExecutor::new(vec![MockCommand::new([
            "terraform",
            "workspace",
            "select",
            "nope",
        ])
        .stderr("Workspace \"nope\" doesn't exist.")
        .exit_code(1)]));

        let err = TerraformCli::new(mock)
            .workspace_select(&ExecContext::background(), "nope")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("doesn't exist"));
    }
}
