//! Fail-fast semantics: a non-zero step halts the run and later steps are
//! never attempted

use crate::helpers::*;
use gantry::core::{PipelineRun, Platform, RunStatus, Step, TriggerKind};
use gantry::secrets::StaticSecretStore;

fn three_steps() -> Vec<Step> {
    vec![
        Step::new("a", "run-a"),
        Step::new("b", "run-b"),
        Step::new("c", "run-c"),
    ]
}

#[tokio::test]
async fn test_all_steps_succeed_exits_zero() {
    let mut run = PipelineRun::new("ci", Platform::Linux, TriggerKind::Push, three_steps());
    let runner = ScriptedRunner::succeeding();
    let log = runner.dispatch_log();

    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.exit_code, 0);
    assert_eq!(logged_commands(&log), vec!["run-a", "run-b", "run-c"]);
}

#[tokio::test]
async fn test_failure_halts_before_later_steps() {
    let mut run = PipelineRun::new("ci", Platform::Linux, TriggerKind::Push, three_steps());
    let runner = ScriptedRunner::succeeding().fail_on("run-b", 101);
    let log = runner.dispatch_log();

    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_eq!(report.status, RunStatus::Halted);
    assert_eq!(report.exit_code, 101);

    assert_step_succeeded(&report, "a");
    assert_step_failed(&report, "b");
    // The command for c must never have been dispatched.
    assert_step_pending(&report, "c");
    assert_eq!(logged_commands(&log), vec!["run-a", "run-b"]);
}

#[tokio::test]
async fn test_exit_code_is_the_first_failing_steps() {
    let mut run = PipelineRun::new(
        "ci",
        Platform::Macos,
        TriggerKind::Push,
        vec![
            Step::new("first", "break-first"),
            Step::new("second", "break-second"),
        ],
    );
    let runner = ScriptedRunner::succeeding()
        .fail_on("break-first", 3)
        .fail_on("break-second", 9);

    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_eq!(report.exit_code, 3);
    assert_step_failed(&report, "first");
    assert_step_pending(&report, "second");
}

#[tokio::test]
async fn test_skips_do_not_affect_the_exit_code() {
    let mut run = PipelineRun::new(
        "ci",
        Platform::Linux,
        TriggerKind::Push,
        vec![
            Step::new("build", "cargo build"),
            Step::new("publish", "cargo publish").with_secret("REGISTRY_TOKEN"),
        ],
    );

    let report = execute_with_runner(
        &mut run,
        ScriptedRunner::succeeding(),
        &StaticSecretStore::empty(),
    )
    .await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.exit_code, 0);
    assert_step_succeeded(&report, "build");
    assert_step_skipped(&report, "publish");
}

#[tokio::test]
async fn test_skipped_step_after_a_halt_stays_pending() {
    let mut run = PipelineRun::new(
        "ci",
        Platform::Linux,
        TriggerKind::Push,
        vec![
            Step::new("broken", "break-here"),
            Step::new("gated", "never").with_secret("ABSENT"),
        ],
    );
    let runner = ScriptedRunner::succeeding().fail_on("break-here", 1);

    let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

    assert_step_failed(&report, "broken");
    // Gates are only consulted for steps the run actually reaches.
    assert_step_pending(&report, "gated");
}
