//! Typed facade over the terraform CLI.
//!
//! [`TerraformCli`] turns typed parameters into an argument vector, hands it to
//! a [`CommandExecutor`] and decodes the output. One method per sub-command;
//! the methods live next to the commands they wrap (`version.rs`,
//! `lifecycle.rs`, `state_cmd.rs`, `workspace.rs`).

pub mod args;
mod lifecycle;
pub mod state;
mod state_cmd;
mod version;
mod workspace;

pub use args::CommandArgs;
pub use state::{Plan, State};

use crate::config::TerraformConfig;
use crate::context::ExecContext;
use crate::error::{Result, TfExecError};
use crate::traits::{CommandExecutor, Invocation};
use args::has_prefix_option;
use serde::Deserialize;
use state::TempBlob;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_EXEC_PATH: &str = "terraform";

pub(crate) const STATE_FLAG: &str = "-state=";
pub(crate) const STATE_OUT_FLAG: &str = "-state-out=";
pub(crate) const OUT_FLAG: &str = "-out=";

/// What to do when a state blob is passed together with an explicit `-state=` option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateFlagPolicy {
    /// Fail with [`TfExecError::ConflictingOption`] before anything runs
    #[default]
    Reject,
    /// Pass both flags through and let terraform reject them
    PassThrough,
}

/// Terraform CLI bound to an executor
#[derive(Clone)]
pub struct TerraformCli {
    executor: Arc<dyn CommandExecutor>,
    exec_path: String,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    state_flag_policy: StateFlagPolicy,
}

impl TerraformCli {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            exec_path: DEFAULT_EXEC_PATH.to_string(),
            working_dir: None,
            env: Vec::new(),
            state_flag_policy: StateFlagPolicy::default(),
        }
    }

    pub fn from_config(executor: Arc<dyn CommandExecutor>, config: &TerraformConfig) -> Self {
        let mut cli = Self::new(executor)
            .with_working_dir(config.working_dir.clone())
            .with_env(config.env.clone())
            .with_state_flag_policy(config.state_flag_policy);
        if let Some(path) = &config.exec_path {
            cli.set_exec_path(path);
        }
        cli
    }

    /// Program to run, looked up through `PATH` unless it contains a separator
    pub fn set_exec_path(&mut self, path: impl Into<String>) {
        self.exec_path = path.into();
    }

    pub fn exec_path(&self) -> &str {
        &self.exec_path
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn with_state_flag_policy(mut self, policy: StateFlagPolicy) -> Self {
        self.state_flag_policy = policy;
        self
    }

    pub fn state_flag_policy(&self) -> StateFlagPolicy {
        self.state_flag_policy
    }

    fn invocation(&self, args: CommandArgs) -> Invocation {
        Invocation::new(&self.exec_path, args.into_vec())
            .with_working_dir(self.working_dir.clone())
            .with_env(self.env.clone())
    }

    /// Run and return stdout; a non-zero exit is an error whatever stdout says
    pub(crate) async fn run(&self, ctx: &ExecContext, args: CommandArgs) -> Result<String> {
        let invocation = self.invocation(args);
        let command = invocation.command_line();
        tracing::debug!(command = %command, "running terraform");

        let output = self.executor.run(ctx, &invocation).await?;
        if !output.success() {
            tracing::warn!(
                command = %command,
                exit_code = ?output.exit_code,
                "terraform command failed"
            );
            return Err(TfExecError::ExitStatus {
                command,
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }

    /// Write `blob` to a temp file for a flag like `-state=`, honouring the conflict policy.
    ///
    /// The check runs before anything touches the disk.
    pub(crate) fn blob_for_flag(
        &self,
        flag: &str,
        file_name: &str,
        blob: Option<&[u8]>,
        opts: &[&str],
    ) -> Result<Option<TempBlob>> {
        let Some(bytes) = blob else {
            return Ok(None);
        };

        if has_prefix_option(opts, flag) {
            match self.state_flag_policy {
                StateFlagPolicy::Reject => {
                    return Err(TfExecError::ConflictingOption {
                        flag: flag.to_string(),
                        options: opts.iter().map(|s| s.to_string()).collect(),
                    });
                }
                StateFlagPolicy::PassThrough => {
                    tracing::debug!(flag, "passing duplicate flag through to terraform");
                }
            }
        }

        TempBlob::write(file_name, bytes).map(Some)
    }

    /// Relative paths given in options are relative to the process working dir
    pub(crate) fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
