use crate::context::{ExecContext, Interruption};
use crate::error::{Result, TfExecError};
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// A fully assembled command: program, arguments, working directory and environment overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Layered on top of the inherited environment
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            env: Vec::new(),
        }
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Space-joined argv, used in logs and error messages
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for executing terraform invocations, allowing for mocking in tests
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the invocation to completion, or until `ctx` fires.
    ///
    /// A non-zero exit code is not an error at this level; callers decide what it means.
    async fn run(&self, ctx: &ExecContext, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Real command executor using tokio::process::Command
#[derive(Debug, Clone, Default)]
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    fn configure(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        command
    }
}

enum Outcome {
    Exited(io::Result<(ExitStatus, Vec<u8>, Vec<u8>)>),
    Interrupted(Interruption),
}

#[async_trait]
impl CommandExecutor for RealCommandExecutor {
    async fn run(&self, ctx: &ExecContext, invocation: &Invocation) -> Result<CommandOutput> {
        let command_line = invocation.command_line();

        if let Some(reason) = ctx.interruption() {
            return Err(interrupted(reason, command_line));
        }

        tracing::debug!(command = %command_line, dir = ?invocation.working_dir, "spawning process");
        if !invocation.env.is_empty() {
            tracing::trace!(
                vars = ?invocation.env.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
                "environment overrides"
            );
        }

        let mut child = Self::configure(invocation)
            .spawn()
            .map_err(|source| TfExecError::Launch {
                command: command_line.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = tokio::select! {
            result = collect(&mut child, stdout, stderr) => Outcome::Exited(result),
            reason = ctx.done() => Outcome::Interrupted(reason),
        };

        match outcome {
            Outcome::Exited(result) => {
                let (status, stdout, stderr) = result?;
                tracing::debug!(command = %command_line, code = ?status.code(), "process exited");
                Ok(CommandOutput {
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                    exit_code: status.code(),
                })
            }
            Outcome::Interrupted(reason) => {
                tracing::warn!(command = %command_line, ?reason, "terminating process");
                if let Err(e) = child.kill().await {
                    tracing::warn!(command = %command_line, error = %e, "failed to kill process");
                }
                Err(interrupted(reason, command_line))
            }
        }
    }
}

pub(crate) fn interrupted(reason: Interruption, command: String) -> TfExecError {
    match reason {
        Interruption::Cancelled => TfExecError::Cancelled { command },
        Interruption::DeadlineExceeded => TfExecError::DeadlineExceeded { command },
    }
}

async fn collect(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))?;
    Ok((status, stdout, stderr))
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
