//! Whole-pipeline scenarios: built-in workflow and YAML-loaded configs
//! driven through the engine

use crate::helpers::*;
use gantry::core::workflow::{verification_run, NPCAP_OEM_URL};
use gantry::core::{PipelineConfig, PipelineRun, Platform, RunStatus, TriggerKind};
use gantry::execution::{ExecutionEngine, RunEvent};
use gantry::secrets::StaticSecretStore;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_linux_push_runs_the_full_verification_sequence() {
    let mut run = verification_run(Platform::Linux, TriggerKind::Push);
    let runner = ScriptedRunner::succeeding();
    let log = runner.dispatch_log();

    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.executed(),
        vec![
            "checkout",
            "toolchain install",
            "install linux deps",
            "fmt check",
            "build",
            "lint",
            "test"
        ]
    );
    assert_eq!(report.skipped(), vec!["install windows deps"]);

    let commands = logged_commands(&log);
    assert_eq!(commands.len(), 7);
    assert!(commands[2].contains("apt-get install"));
    assert!(commands.last().unwrap().contains("cargo test"));
}

#[tokio::test]
async fn test_windows_pull_request_runs_the_reduced_sequence() {
    let mut run = verification_run(Platform::Windows, TriggerKind::PullRequest);
    let runner = ScriptedRunner::succeeding();
    let log = runner.dispatch_log();

    // Even with the secret in hand the trigger guard wins.
    let secrets = StaticSecretStore::empty().with(NPCAP_OEM_URL, "https://example.test/sdk.zip");
    let report = execute_with_runner(&mut run, runner, &secrets).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.executed(),
        vec!["checkout", "toolchain install", "fmt check"]
    );
    assert_eq!(logged_commands(&log).len(), 3);
}

#[tokio::test]
async fn test_yaml_config_round_trip_through_the_engine() {
    let yaml = r#"
name: "release checks"
steps:
  - name: "prepare"
    run: "mkdir -p ${OUT_DIR}"
    env:
      OUT_DIR: "target/release-artifacts"
  - name: "package"
    run: "tar -C ${OUT_DIR} -czf bundle.tar.gz ."
  - name: "upload"
    run: "push-artifact bundle.tar.gz"
    secrets: [ARTIFACT_TOKEN]
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = PipelineConfig::from_file(file.path()).unwrap();
    let mut run = PipelineRun::from_config(&config, Platform::Linux, TriggerKind::Push);

    let runner = ScriptedRunner::succeeding();
    let log = runner.dispatch_log();
    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_eq!(report.status, RunStatus::Completed);
    // The exported variable is substituted into both later commands.
    assert_eq!(
        logged_commands(&log),
        vec![
            "mkdir -p target/release-artifacts",
            "tar -C target/release-artifacts -czf bundle.tar.gz ."
        ]
    );
    assert_step_skipped(&report, "upload");
}

#[tokio::test]
async fn test_event_stream_matches_the_run() {
    let mut run = verification_run(Platform::Windows, TriggerKind::Push);
    let mut engine = ExecutionEngine::new(ScriptedRunner::succeeding());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    engine.add_event_handler(move |event| {
        let label = match event {
            RunEvent::RunStarted { .. } => "run-started".to_string(),
            RunEvent::StepStarted { step } => format!("started:{}", step),
            RunEvent::StepSkipped { step, .. } => format!("skipped:{}", step),
            RunEvent::StepSucceeded { step } => format!("ok:{}", step),
            RunEvent::StepFailed { step, .. } => format!("failed:{}", step),
            RunEvent::RunFinished { .. } => "run-finished".to_string(),
        };
        sink.lock().unwrap().push(label);
    });

    let report = engine
        .execute(&mut run, &StaticSecretStore::empty())
        .await;
    assert_eq!(report.status, RunStatus::Completed);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            "run-started",
            "started:checkout",
            "ok:checkout",
            "started:toolchain install",
            "ok:toolchain install",
            "skipped:install linux deps",
            "skipped:install windows deps",
            "started:fmt check",
            "ok:fmt check",
            "started:build",
            "ok:build",
            "started:lint",
            "ok:lint",
            "started:test",
            "ok:test",
            "run-finished"
        ]
    );
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let mut run = verification_run(Platform::Macos, TriggerKind::Push);
    let report = execute_with_runner(
        &mut run,
        ScriptedRunner::succeeding(),
        &StaticSecretStore::empty(),
    )
    .await;

    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"pipeline\": \"verify\""));
    assert!(json.contains("\"platform\": \"macos\""));

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["exit_code"], 0);
}
