use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use terrarium::backend::StateFlags;
use terrarium::cli::execute_init_command;
use terrarium::config::Config;
use terrarium::terraform::{InitOption, TerraformRunner};
use terrarium::{Result, TerrariumError};

/// Records every init call instead of spawning terraform
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TerraformRunner for RecordingRunner {
    async fn init(&self, working_dir: &Path, options: &[InitOption]) -> Result<()> {
        self.calls.lock().unwrap().push((
            working_dir.to_path_buf(),
            options.iter().map(InitOption::to_arg).collect(),
        ));
        Ok(())
    }
}

struct Layout {
    _temp_dir: TempDir,
    root: PathBuf,
    stack: PathBuf,
}

fn layout(files: &[(&str, &str)]) -> Layout {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    let stack = root.join("stacks").join("network");
    std::fs::create_dir_all(&stack).unwrap();

    for (path, contents) in files {
        std::fs::write(root.join(path), contents).unwrap();
    }

    Layout {
        _temp_dir: temp_dir,
        root,
        stack,
    }
}

fn config_for(layout: &Layout) -> Config {
    Config {
        var_root: layout.root.to_string_lossy().into_owned(),
        ..Default::default()
    }
}

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

#[cfg(test)]
mod remote_state_tests {
    use super::*;

    #[tokio::test]
    async fn test_options_from_var_files() {
        let layout = layout(&[
            (
                "global.tfvars.json",
                r#"{"project": "shop", "region": "eu-central-1", "account": 123456789012}"#,
            ),
            ("stacks/network/prod.tfvars.json", r#"{"region": "eu-west-1"}"#),
        ]);
        let runner = RecordingRunner::default();

        execute_init_command(
            "prod",
            &layout.stack,
            &StateFlags::default(),
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, layout.stack);
        assert_eq!(
            calls[0].1,
            vec![
                "-backend-config=region=eu-west-1",
                "-backend-config=bucket=tf-state-shop-eu-west-1-123456789012",
                "-backend-config=key=network.tfstate",
                "-backend-config=dynamodb_table=terraform-lock-shop-eu-west-1-123456789012",
                "-upgrade=true",
            ]
        );
    }

    #[tokio::test]
    async fn test_flags_override_var_files() {
        let layout = layout(&[(
            "dev.tfvars.json",
            r#"{"project": "shop", "region": "eu-central-1", "bucket": "from-vars", "name": "vars-name"}"#,
        )]);
        let flags = StateFlags {
            state_bucket: Some("from-flag".to_string()),
            state_region: Some("us-east-2".to_string()),
            state_name: Some("flag-name".to_string()),
            state_dynamo: Some("locks".to_string()),
            ..Default::default()
        };
        let runner = RecordingRunner::default();

        execute_init_command(
            "dev",
            &layout.stack,
            &flags,
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap();

        assert_eq!(
            runner.calls()[0].1,
            vec![
                "-backend-config=region=us-east-2",
                "-backend-config=bucket=from-flag",
                "-backend-config=key=flag-name.tfstate",
                "-backend-config=dynamodb_table=locks",
                "-upgrade=true",
            ]
        );
    }

    #[tokio::test]
    async fn test_region_from_environment() {
        let layout = layout(&[("global.tfvars.json", r#"{"project": "shop"}"#)]);
        let env: HashMap<String, String> =
            [("AWS_REGION".to_string(), "ap-south-1".to_string())].into();
        let flags = StateFlags {
            state_lock: false,
            ..Default::default()
        };
        let runner = RecordingRunner::default();

        execute_init_command("dev", &layout.stack, &flags, &config_for(&layout), &runner, &env)
            .await
            .unwrap();

        let args = &runner.calls()[0].1;
        assert_eq!(args[0], "-backend-config=region=ap-south-1");
        assert_eq!(args[1], "-backend-config=bucket=tf-state-shop-ap-south-1-");
        assert_eq!(args.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_region_fails_before_terraform() {
        let layout = layout(&[("global.tfvars.json", r#"{"project": "shop"}"#)]);
        let runner = RecordingRunner::default();

        let err = execute_init_command(
            "dev",
            &layout.stack,
            &StateFlags::default(),
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TerrariumError::MissingRegion));
        assert!(runner.calls().is_empty());
    }
}

#[cfg(test)]
mod local_state_tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_state_disabled() {
        let layout = layout(&[]);
        let flags = StateFlags {
            remote_state: false,
            ..Default::default()
        };
        let runner = RecordingRunner::default();

        execute_init_command(
            "dev",
            &layout.stack,
            &flags,
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap();

        assert_eq!(runner.calls()[0].1, vec!["-backend=false", "-upgrade=true"]);
    }

    #[tokio::test]
    async fn test_invalid_var_file_is_reported() {
        let layout = layout(&[("dev.tfvars.json", "{ not json")]);
        let runner = RecordingRunner::default();

        let err = execute_init_command(
            "dev",
            &layout.stack,
            &StateFlags::default(),
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TerrariumError::VarFileError { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_stack_is_rejected() {
        let layout = layout(&[]);
        let runner = RecordingRunner::default();

        let err = execute_init_command(
            "dev",
            &layout.root.join("stacks").join("missing"),
            &StateFlags::default(),
            &config_for(&layout),
            &runner,
            &no_env(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TerrariumError::InvalidArgument(_)));
    }
}
