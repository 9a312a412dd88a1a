//! Configuration for the terraform facade, typically loaded from `.tfexec.yaml`
//!
//! ```yaml
//! exec_path: /usr/local/bin/terraform
//! working_dir: infra/prod
//! timeout_secs: 600
//! state_flag_policy: pass-through
//! env:
//!   TF_IN_AUTOMATION: "1"
//! ```

use crate::error::{Result, TfExecError};
use crate::terraform::{DEFAULT_EXEC_PATH, StateFlagPolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".tfexec.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerraformConfig {
    /// Program to run, defaults to `terraform` looked up through `PATH`
    pub exec_path: Option<String>,
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables for every invocation
    pub env: BTreeMap<String, String>,
    pub timeout_secs: Option<u64>,
    pub state_flag_policy: StateFlagPolicy,
}

impl TerraformConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: TerraformConfig = serde_yaml::from_str(content)
            .map_err(|e| TfExecError::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TfExecError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load `.tfexec.yaml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject settings terraform could never run with
    pub fn validate(&self) -> Result<()> {
        if self.exec_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(TfExecError::Config("exec_path must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(TfExecError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = self.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            return Err(TfExecError::Config(format!(
                "invalid environment variable name: {:?}",
                key
            )));
        }
        Ok(())
    }

    pub fn exec_path(&self) -> &str {
        self.exec_path.as_deref().unwrap_or(DEFAULT_EXEC_PATH)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerraformConfig::default();
        assert_eq!(config.exec_path(), "terraform");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.state_flag_policy, StateFlagPolicy::Reject);
    }

    #[test]
    fn test_from_yaml() {
        let config = TerraformConfig::from_yaml(
            r#"
exec_path: /usr/local/bin/tofu
working_dir: infra/prod
timeout_secs: 600
state_flag_policy: pass-through
env:
  TF_IN_AUTOMATION: "1"
"#,
        )
        .unwrap();

        assert_eq!(config.exec_path(), "/usr/local/bin/tofu");
        assert_eq!(config.working_dir, Some(PathBuf::from("infra/prod")));
        assert_eq!(config.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.state_flag_policy, StateFlagPolicy::PassThrough);
        assert_eq!(config.env.get("TF_IN_AUTOMATION").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TerraformConfig::from_yaml("exec_pth: terraform\n").unwrap_err();
        assert!(matches!(err, TfExecError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(TerraformConfig::from_yaml("timeout_secs: 0\n").is_err());
    }

    #[test]
    fn test_bad_env_name_rejected() {
        assert!(TerraformConfig::from_yaml("env:\n  \"A=B\": x\n").is_err());
    }

    #[test]
    fn test_discover_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TerraformConfig::discover(dir.path()).unwrap();
        assert_eq!(config, TerraformConfig::default());
    }

    #[test]
    fn test_discover_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "exec_path: tofu\n").unwrap();

        let config = TerraformConfig::discover(dir.path()).unwrap();
        assert_eq!(config.exec_path(), "tofu");
    }
}
