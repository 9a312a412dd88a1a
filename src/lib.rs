//! tfexec - typed wrapper around the terraform CLI
//!
//! Builds terraform invocations from typed parameters, runs them through a
//! swappable [`CommandExecutor`] and parses what comes back.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tfexec::{ExecContext, RealCommandExecutor, TerraformCli};
//!
//! # async fn example() -> tfexec::Result<()> {
//! let cli = TerraformCli::new(Arc::new(RealCommandExecutor::new()));
//! let ctx = ExecContext::background();
//!
//! let version = cli.version(&ctx).await?;
//! let resources = cli.state_list(&ctx, None, &[], &[]).await?;
//! println!("terraform {} manages {} resources", version, resources.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod parser;
pub mod terraform;
pub mod traits;

pub use config::TerraformConfig;
pub use context::{CancelHandle, ExecContext, Interruption};
pub use error::{Result, TfExecError};
pub use terraform::{Plan, State, StateFlagPolicy, TerraformCli};
pub use traits::{
    CommandExecutor, CommandOutput, Invocation, MockCommand, MockCommandExecutor,
    RealCommandExecutor,
};
