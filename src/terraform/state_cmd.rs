use super::state::TempBlob;
use super::{CommandArgs, STATE_FLAG, STATE_OUT_FLAG, State, TerraformCli};
use crate::context::ExecContext;
use crate::error::{Result, TfExecError};
use crate::parser::parse_resource_list;

const STATE_FILE: &str = "terraform.tfstate";
const STATE_OUT_FILE: &str = "terraform-out.tfstate";

impl TerraformCli {
    /// `terraform state list [-state=<tmp>] [opts...] [addresses...]`
    pub async fn state_list(
        &self,
        ctx: &ExecContext,
        state: Option<&State>,
        addresses: &[&str],
        opts: &[&str],
    ) -> Result<Vec<String>> {
        let state_file =
            self.blob_for_flag(STATE_FLAG, STATE_FILE, state.map(State::bytes), opts)?;

        let args = with_blob_flag(CommandArgs::new(["state", "list"]), &state_file, STATE_FLAG)
            .options(opts)
            .positionals(addresses);

        let stdout = self.run(ctx, args).await?;
        Ok(parse_resource_list(&stdout))
    }

    /// `terraform state pull [opts...]`
    pub async fn state_pull(&self, ctx: &ExecContext, opts: &[&str]) -> Result<State> {
        let stdout = self
            .run(ctx, CommandArgs::new(["state", "pull"]).options(opts))
            .await?;
        Ok(State::new(stdout))
    }

    /// `terraform state push [opts...] <tmp>`
    pub async fn state_push(&self, ctx: &ExecContext, state: &State, opts: &[&str]) -> Result<()> {
        let state_file = TempBlob::write(STATE_FILE, state.bytes())?;

        let args = CommandArgs::new(["state", "push"])
            .options(opts)
            .positional(state_file.path().display().to_string());

        self.run(ctx, args).await?;
        Ok(())
    }

    /// `terraform state mv [-state=<tmp>] [-state-out=<tmp>] [opts...] <source> <destination>`
    ///
    /// Returns the updated `state` and `state_out` blobs, each `Some` only when the
    /// corresponding input was given.
    pub async fn state_mv(
        &self,
        ctx: &ExecContext,
        state: Option<&State>,
        state_out: Option<&State>,
        source: &str,
        destination: &str,
        opts: &[&str],
    ) -> Result<(Option<State>, Option<State>)> {
        require_non_empty("source address", source)?;
        require_non_empty("destination address", destination)?;

        let state_file =
            self.blob_for_flag(STATE_FLAG, STATE_FILE, state.map(State::bytes), opts)?;
        let state_out_file = self.blob_for_flag(
            STATE_OUT_FLAG,
            STATE_OUT_FILE,
            state_out.map(State::bytes),
            opts,
        )?;

        let args = CommandArgs::new(["state", "mv"]);
        let args = with_blob_flag(args, &state_file, STATE_FLAG);
        let args = with_blob_flag(args, &state_out_file, STATE_OUT_FLAG)
            .options(opts)
            .positionals([source, destination]);

        self.run(ctx, args).await?;

        Ok((
            read_back(&state_file).await?,
            read_back(&state_out_file).await?,
        ))
    }

    /// `terraform state rm [-state=<tmp>] [opts...] <addresses...>`
    ///
    /// Returns the updated state when one was given.
    pub async fn state_rm(
        &self,
        ctx: &ExecContext,
        state: Option<&State>,
        addresses: &[&str],
        opts: &[&str],
    ) -> Result<Option<State>> {
        if addresses.is_empty() {
            return Err(TfExecError::InvalidArgument(
                "state rm needs at least one address".to_string(),
            ));
        }

        let state_file =
            self.blob_for_flag(STATE_FLAG, STATE_FILE, state.map(State::bytes), opts)?;

        let args = with_blob_flag(CommandArgs::new(["state", "rm"]), &state_file, STATE_FLAG)
            .options(opts)
            .positionals(addresses);

        self.run(ctx, args).await?;
        read_back(&state_file).await
    }

    /// `terraform import [-state=<tmp>] [opts...] <address> <id>`
    ///
    /// Returns the updated state when one was given. `-state-out` defaults to
    /// `-state`, so terraform writes the result back into the same temp file.
    pub async fn import(
        &self,
        ctx: &ExecContext,
        state: Option<&State>,
        address: &str,
        id: &str,
        opts: &[&str],
    ) -> Result<Option<State>> {
        require_non_empty("import address", address)?;
        require_non_empty("import id", id)?;

        let state_file =
            self.blob_for_flag(STATE_FLAG, STATE_FILE, state.map(State::bytes), opts)?;

        let args = with_blob_flag(CommandArgs::new(["import"]), &state_file, STATE_FLAG)
            .options(opts)
            .positionals([address, id]);

        self.run(ctx, args).await?;
        read_back(&state_file).await
    }
}

fn with_blob_flag(args: CommandArgs, file: &Option<TempBlob>, flag: &str) -> CommandArgs {
    match file {
        Some(file) => args.option(file.flag(flag)),
        None => args,
    }
}

async fn read_back(file: &Option<TempBlob>) -> Result<Option<State>> {
    match file {
        Some(file) => Ok(Some(State::new(file.read().await?))),
        None => Ok(None),
    }
}

fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TfExecError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}
