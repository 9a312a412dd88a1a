pub mod lifecycle;
pub mod state;
pub mod version;
pub mod workspace;

pub use lifecycle::LifecycleCommand;
pub use state::StateCommand;
pub use version::VersionCommand;
pub use workspace::WorkspaceCommand;

use anyhow::{Context, Result};
use std::path::Path;
use tfexec::{ExecContext, State, TerraformCli};

/// The facade and the context shared by every command of one run
pub struct Session {
    pub cli: TerraformCli,
    pub ctx: ExecContext,
}

/// Trailing `-- opts...` as the `&[&str]` the facade takes
pub(crate) fn as_strs(opts: &[String]) -> Vec<&str> {
    opts.iter().map(String::as_str).collect()
}

pub(crate) async fn read_state(path: Option<&Path>) -> Result<Option<State>> {
    match path {
        Some(path) => {
            let state = State::from_file(path)
                .await
                .with_context(|| format!("Failed to read state file: {:?}", path))?;
            Ok(Some(state))
        }
        None => Ok(None),
    }
}

pub(crate) async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write file: {:?}", path))
}
