use super::{Session, as_strs, read_state, write_file};
use crate::output;
use anyhow::{Context, Result};
use std::path::Path;
use tfexec::State;

pub struct StateCommand;

impl StateCommand {
    /// Print one resource address per line
    pub async fn list(
        session: &Session,
        state: Option<&Path>,
        addresses: &[String],
        opts: &[String],
    ) -> Result<()> {
        let state = read_state(state).await?;
        let resources = session
            .cli
            .state_list(
                &session.ctx,
                state.as_ref(),
                &as_strs(addresses),
                &as_strs(opts),
            )
            .await
            .context("terraform state list failed")?;

        for address in &resources {
            output::data(address);
        }
        Ok(())
    }

    /// Write the pulled state to `out`, or stdout
    pub async fn pull(session: &Session, out: Option<&Path>, opts: &[String]) -> Result<()> {
        let state = session
            .cli
            .state_pull(&session.ctx, &as_strs(opts))
            .await
            .context("terraform state pull failed")?;

        match out {
            Some(out) => {
                write_file(out, state.bytes()).await?;
                output::key_value("State saved to", &out.display().to_string());
            }
            None => output::raw(state.bytes()).context("Failed to write state to stdout")?,
        }
        Ok(())
    }

    pub async fn push(session: &Session, file: &Path, opts: &[String]) -> Result<()> {
        let state = State::from_file(file)
            .await
            .with_context(|| format!("Failed to read state file: {:?}", file))?;
        session
            .cli
            .state_push(&session.ctx, &state, &as_strs(opts))
            .await
            .context("terraform state push failed")?;
        output::success("State pushed");
        Ok(())
    }

    /// Move an address; local state files given with `--state`/`--state-out` are updated in place
    pub async fn mv(
        session: &Session,
        state_path: Option<&Path>,
        state_out_path: Option<&Path>,
        source: &str,
        destination: &str,
        opts: &[String],
    ) -> Result<()> {
        let state = read_state(state_path).await?;
        let state_out = read_state(state_out_path).await?;

        let (updated, updated_out) = session
            .cli
            .state_mv(
                &session.ctx,
                state.as_ref(),
                state_out.as_ref(),
                source,
                destination,
                &as_strs(opts),
            )
            .await
            .context("terraform state mv failed")?;

        write_back(state_path, updated).await?;
        write_back(state_out_path, updated_out).await?;
        output::success(&format!("Moved {} to {}", source, destination));
        Ok(())
    }

    pub async fn rm(
        session: &Session,
        state_path: Option<&Path>,
        addresses: &[String],
        opts: &[String],
    ) -> Result<()> {
        let state = read_state(state_path).await?;
        let updated = session
            .cli
            .state_rm(
                &session.ctx,
                state.as_ref(),
                &as_strs(addresses),
                &as_strs(opts),
            )
            .await
            .context("terraform state rm failed")?;

        write_back(state_path, updated).await?;
        output::success(&format!("Removed {} address(es)", addresses.len()));
        Ok(())
    }

    pub async fn import(
        session: &Session,
        state_path: Option<&Path>,
        address: &str,
        id: &str,
        opts: &[String],
    ) -> Result<()> {
        let state = read_state(state_path).await?;
        let updated = session
            .cli
            .import(&session.ctx, state.as_ref(), address, id, &as_strs(opts))
            .await
            .context("terraform import failed")?;

        write_back(state_path, updated).await?;
        output::success(&format!("Imported {} as {}", id, address));
        Ok(())
    }
}

async fn write_back(path: Option<&Path>, state: Option<State>) -> Result<()> {
    if let (Some(path), Some(state)) = (path, state) {
        write_file(path, state.bytes()).await?;
        output::key_value("Updated", &path.display().to_string());
    }
    Ok(())
}
