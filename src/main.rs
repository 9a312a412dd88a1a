mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{LifecycleCommand, Session, StateCommand, VersionCommand, WorkspaceCommand};
use std::path::PathBuf;
use std::sync::Arc;
use tfexec::{ExecContext, RealCommandExecutor, StateFlagPolicy, TerraformCli, TerraformConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tfexec")]
#[command(about = "Run terraform sub-commands with typed arguments and parsed output", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./.tfexec.yaml when present)
    #[arg(long, global = true, env = "TFEXEC_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the terraform binary
    #[arg(long, global = true, env = "TFEXEC_TERRAFORM_PATH")]
    terraform_path: Option<String>,

    /// Working directory for terraform
    #[arg(long, global = true)]
    chdir: Option<PathBuf>,

    /// Kill terraform after this many seconds
    #[arg(long, global = true, env = "TFEXEC_TIMEOUT")]
    timeout: Option<u64>,

    /// Extra environment variable for terraform (KEY=VALUE, repeatable)
    #[arg(long = "env", global = true, value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Pass an explicit -state= through even when --state is also given
    #[arg(long, global = true)]
    allow_duplicate_state_flag: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the terraform version
    Version {
        /// Fail unless the version matches this requirement (e.g. ">=1.5")
        #[arg(long)]
        require: Option<String>,
    },

    /// Run terraform init
    Init {
        /// Options passed to terraform after `--`
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Run terraform plan
    Plan {
        /// Local state file to plan against
        #[arg(long)]
        state: Option<PathBuf>,
        /// Where to save the plan file
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Run terraform apply
    Apply {
        /// Saved plan file to apply
        #[arg(long)]
        plan: Option<PathBuf>,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Run terraform destroy
    Destroy {
        /// Configuration directory
        dir: Option<String>,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Import an existing resource
    Import {
        /// Local state file, updated in place
        #[arg(long)]
        state: Option<PathBuf>,
        address: String,
        id: String,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// State sub-commands
    State {
        #[command(subcommand)]
        command: StateCommands,
    },

    /// Workspace sub-commands
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// List resource addresses
    List {
        #[arg(long)]
        state: Option<PathBuf>,
        addresses: Vec<String>,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Print or save the current state
    Pull {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Overwrite the remote state with a local file
    Push {
        file: PathBuf,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Move a resource address
    Mv {
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        state_out: Option<PathBuf>,
        source: String,
        destination: String,
        #[arg(last = true)]
        opts: Vec<String>,
    },

    /// Remove resource addresses from the state
    Rm {
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(required = true)]
        addresses: Vec<String>,
        #[arg(last = true)]
        opts: Vec<String>,
    },
}

#[derive(Subcommand)]
enum WorkspaceCommands {
    /// Create a workspace
    New {
        name: String,
        #[arg(last = true)]
        opts: Vec<String>,
    },
    /// Switch to a workspace
    Select { name: String },
    /// Print the current workspace
    Show,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty variable name in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Config file first, then flags and environment on top
fn load_config(cli: &Cli) -> Result<TerraformConfig> {
    let mut config = match &cli.config {
        Some(path) => TerraformConfig::from_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            TerraformConfig::discover(&cwd)?
        }
    };

    if let Some(path) = &cli.terraform_path {
        config.exec_path = Some(path.clone());
    }
    if let Some(dir) = &cli.chdir {
        config.working_dir = Some(dir.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }
    config.env.extend(cli.env.iter().cloned());
    if cli.allow_duplicate_state_flag {
        config.state_flag_policy = StateFlagPolicy::PassThrough;
    }
    config.validate()?;

    Ok(config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let (ctx, cancel) = ExecContext::background().with_cancel();
    let ctx = match config.timeout() {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    };
    ctrlc::set_handler(move || {
        output::warning("Interrupted, stopping terraform...");
        cancel.cancel();
    })
    .context("Failed to install Ctrl-C handler")?;

    let session = Session {
        cli: TerraformCli::from_config(Arc::new(RealCommandExecutor::new()), &config),
        ctx,
    };
    tracing::debug!(exec_path = session.cli.exec_path(), "tfexec starting");

    match cli.command {
        Commands::Version { require } => {
            VersionCommand::execute(&session, require.as_deref()).await?;
        }
        Commands::Init { opts } => {
            LifecycleCommand::init(&session, &opts).await?;
        }
        Commands::Plan { state, out, opts } => {
            LifecycleCommand::plan(&session, state.as_deref(), out.as_deref(), &opts).await?;
        }
        Commands::Apply { plan, opts } => {
            LifecycleCommand::apply(&session, plan.as_deref(), &opts).await?;
        }
        Commands::Destroy { dir, opts } => {
            LifecycleCommand::destroy(&session, dir.as_deref(), &opts).await?;
        }
        Commands::Import {
            state,
            address,
            id,
            opts,
        } => {
            StateCommand::import(&session, state.as_deref(), &address, &id, &opts).await?;
        }
        Commands::State { command } => match command {
            StateCommands::List {
                state,
                addresses,
                opts,
            } => {
                StateCommand::list(&session, state.as_deref(), &addresses, &opts).await?;
            }
            StateCommands::Pull { out, opts } => {
                StateCommand::pull(&session, out.as_deref(), &opts).await?;
            }
            StateCommands::Push { file, opts } => {
                StateCommand::push(&session, &file, &opts).await?;
            }
            StateCommands::Mv {
                state,
                state_out,
                source,
                destination,
                opts,
            } => {
                StateCommand::mv(
                    &session,
                    state.as_deref(),
                    state_out.as_deref(),
                    &source,
                    &destination,
                    &opts,
                )
                .await?;
            }
            StateCommands::Rm {
                state,
                addresses,
                opts,
            } => {
                StateCommand::rm(&session, state.as_deref(), &addresses, &opts).await?;
            }
        },
        Commands::Workspace { command } => match command {
            WorkspaceCommands::New { name, opts } => {
                WorkspaceCommand::new(&session, &name, &opts).await?;
            }
            WorkspaceCommands::Select { name } => {
                WorkspaceCommand::select(&session, &name).await?;
            }
            WorkspaceCommands::Show => {
                WorkspaceCommand::show(&session).await?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("TF_LOG=DEBUG").unwrap(),
            ("TF_LOG".to_string(), "DEBUG".to_string())
        );
        assert_eq!(
            parse_key_val("A=b=c").unwrap(),
            ("A".to_string(), "b=c".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trailing_opts_after_double_dash() {
        let cli = Cli::try_parse_from([
            "tfexec",
            "state",
            "list",
            "null_resource.foo",
            "--",
            "-id=bar",
        ])
        .unwrap();
        match cli.command {
            Commands::State {
                command: StateCommands::List {
                    addresses, opts, ..
                },
            } => {
                assert_eq!(addresses, vec!["null_resource.foo"]);
                assert_eq!(opts, vec!["-id=bar"]);
            }
            _ => panic!("expected state list"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "tfexec",
            "--config",
            "/nonexistent/.tfexec.yaml",
            "version",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "exec_path: tofu\ntimeout_secs: 10\n").unwrap();
        let cli = Cli::try_parse_from([
            "tfexec",
            "--config",
            path.to_str().unwrap(),
            "--terraform-path",
            "/opt/terraform",
            "--env",
            "TF_LOG=DEBUG",
            "--allow-duplicate-state-flag",
            "version",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.exec_path(), "/opt/terraform");
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.env.get("TF_LOG").map(String::as_str), Some("DEBUG"));
        assert_eq!(config.state_flag_policy, StateFlagPolicy::PassThrough);
    }

    #[test]
    fn test_flag_timeouts_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "timeout_secs: 10\n").unwrap();
        let path = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["tfexec", "--config", path, "--timeout", "0", "version"])
            .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));

        let huge = u64::MAX.to_string();
        let cli = Cli::try_parse_from(["tfexec", "--config", path, "--timeout", &huge, "version"])
            .unwrap();
        let config = load_config(&cli).unwrap();
        let ctx = ExecContext::background().with_timeout(config.timeout().unwrap());
        assert!(ctx.deadline().is_none());
    }
}
