use super::args::option_value;
use super::state::TempBlob;
use super::{CommandArgs, OUT_FLAG, Plan, STATE_FLAG, State, TerraformCli};
use crate::context::ExecContext;
use crate::error::Result;

impl TerraformCli {
    /// `terraform init [opts...]`
    pub async fn init(&self, ctx: &ExecContext, opts: &[&str]) -> Result<()> {
        self.run(ctx, CommandArgs::new(["init"]).options(opts)).await?;
        Ok(())
    }

    /// `terraform plan [-state=<tmp>] [-out=<tmp>] [opts...]`
    ///
    /// The saved plan is read back and returned. When `opts` already carry
    /// `-out=`, that file is used (and left in place) instead of a temp file.
    pub async fn plan(
        &self,
        ctx: &ExecContext,
        state: Option<&State>,
        opts: &[&str],
    ) -> Result<Plan> {
        let state_file =
            self.blob_for_flag(STATE_FLAG, "terraform.tfstate", state.map(State::bytes), opts)?;

        let mut args = CommandArgs::new(["plan"]);
        if let Some(file) = &state_file {
            args = args.option(file.flag(STATE_FLAG));
        }

        let (_plan_file, plan_path) = match option_value(opts, OUT_FLAG) {
            Some(path) => (None, self.resolve(path)),
            None => {
                let file = TempBlob::reserve("terraform.tfplan")?;
                args = args.option(file.flag(OUT_FLAG));
                let path = file.path().to_path_buf();
                (Some(file), path)
            }
        };

        self.run(ctx, args.options(opts)).await?;
        Plan::from_file(&plan_path).await
    }

    /// `terraform apply [opts...] [<planfile>]`
    pub async fn apply(&self, ctx: &ExecContext, plan: Option<&Plan>, opts: &[&str]) -> Result<()> {
        let plan_file = plan
            .map(|plan| TempBlob::write("terraform.tfplan", plan.bytes()))
            .transpose()?;

        let mut args = CommandArgs::new(["apply"]).options(opts);
        if let Some(file) = &plan_file {
            args = args.positional(file.path().display().to_string());
        }

        self.run(ctx, args).await?;
        Ok(())
    }

    /// `terraform destroy [opts...] [dir]`
    ///
    /// An empty `dir` is treated as no dir.
    pub async fn destroy(&self, ctx: &ExecContext, dir: Option<&str>, opts: &[&str]) -> Result<()> {
        let mut args = CommandArgs::new(["destroy"]).options(opts);
        if let Some(dir) = dir.filter(|d| !d.is_empty()) {
            args = args.positional(dir);
        }

        self.run(ctx, args).await?;
        Ok(())
    }
}
