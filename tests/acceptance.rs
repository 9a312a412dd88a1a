//! Acceptance tests against a real terraform binary
//!
//! Skipped unless `TF_ACC` is set. The binary is taken from `TFEXEC_TERRAFORM_PATH`,
//! falling back to `terraform` on the PATH. `init` downloads the null provider,
//! so network access is required.

use semver::VersionReq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tfexec::{ExecContext, RealCommandExecutor, TerraformCli, TfExecError};

const NULL_RESOURCES: &str = r#"
resource "null_resource" "foo" {}
resource "null_resource" "bar" {}
"#;

fn acceptance_enabled() -> bool {
    std::env::var_os("TF_ACC").is_some()
}

fn terraform_in(dir: &Path) -> TerraformCli {
    let mut cli = TerraformCli::new(Arc::new(RealCommandExecutor::new()))
        .with_working_dir(Some(dir.to_path_buf()))
        .with_env([("TF_IN_AUTOMATION", "1")]);
    if let Ok(path) = std::env::var("TFEXEC_TERRAFORM_PATH") {
        cli.set_exec_path(path);
    }
    cli
}

#[tokio::test]
async fn test_acc_version() {
    if !acceptance_enabled() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let tf = terraform_in(dir.path());
    let ctx = ExecContext::background();

    let version = tf.version(&ctx).await.unwrap();
    assert!(version.major >= 1 || version.minor >= 12, "unexpected {version}");
    assert!(
        tf.version_satisfies(&ctx, &VersionReq::parse(">=0.12").unwrap())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_acc_apply_list_rm() {
    if !acceptance_enabled() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.tf"), NULL_RESOURCES).unwrap();
    let tf = terraform_in(dir.path());
    let ctx = ExecContext::background();

    tf.init(&ctx, &[]).await.unwrap();
    tf.apply(&ctx, None, &["-auto-approve"]).await.unwrap();

    let resources = tf.state_list(&ctx, None, &[], &[]).await.unwrap();
    assert_eq!(resources, vec!["null_resource.bar", "null_resource.foo"]);

    let state = tf.state_pull(&ctx, &[]).await.unwrap();
    let updated = tf
        .state_rm(&ctx, Some(&state), &["null_resource.foo"], &[])
        .await
        .unwrap()
        .expect("rm with a state blob returns the updated state");
    let remaining = tf.state_list(&ctx, Some(&updated), &[], &[]).await.unwrap();
    assert_eq!(remaining, vec!["null_resource.bar"]);

    // the configured backend state was not touched
    let resources = tf.state_list(&ctx, None, &[], &[]).await.unwrap();
    assert_eq!(resources.len(), 2);

    tf.destroy(&ctx, None, &["-auto-approve"]).await.unwrap();
    let resources = tf.state_list(&ctx, None, &[], &[]).await.unwrap();
    assert!(resources.is_empty());
}

#[tokio::test]
async fn test_acc_workspaces() {
    if !acceptance_enabled() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.tf"), NULL_RESOURCES).unwrap();
    let tf = terraform_in(dir.path());
    let ctx = ExecContext::background();

    tf.init(&ctx, &[]).await.unwrap();
    assert_eq!(tf.workspace_show(&ctx).await.unwrap(), "default");

    tf.workspace_new(&ctx, "staging", &[]).await.unwrap();
    assert_eq!(tf.workspace_show(&ctx).await.unwrap(), "staging");

    tf.workspace_select(&ctx, "default").await.unwrap();
    assert_eq!(tf.workspace_show(&ctx).await.unwrap(), "default");

    let err = tf.workspace_select(&ctx, "missing").await.unwrap_err();
    assert!(matches!(err, TfExecError::ExitStatus { .. }), "{err}");
}
