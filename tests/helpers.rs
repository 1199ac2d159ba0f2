//! Test utility functions for gantry

use async_trait::async_trait;
use gantry::core::{PipelineRun, Platform, Step, StepStatus, TriggerKind};
use gantry::execution::{ExecutionEngine, RunReport};
use gantry::runner::{CommandOutput, CommandRunner, RunnerError};
use gantry::secrets::{SecretStore, StaticSecretStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted runner for deterministic tests
///
/// Succeeds by default; commands containing a registered marker fail with
/// the paired exit code. Records every dispatched command along with the
/// environment it received.
pub struct ScriptedRunner {
    failures: Vec<(String, i32)>,
    dispatched: Arc<Mutex<Vec<Dispatch>>>,
}

/// One recorded dispatch to the scripted runner
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub command: String,
    pub env: HashMap<String, String>,
}

impl ScriptedRunner {
    /// Runner where every command succeeds
    pub fn succeeding() -> Self {
        Self {
            failures: Vec::new(),
            dispatched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail any command containing `marker` with the given exit code
    pub fn fail_on(mut self, marker: &str, exit_code: i32) -> Self {
        self.failures.push((marker.to_string(), exit_code));
        self
    }

    /// Handle to the dispatch log, usable after the runner moves into an
    /// engine
    pub fn dispatch_log(&self) -> Arc<Mutex<Vec<Dispatch>>> {
        self.dispatched.clone()
    }
}

/// Command strings recorded in a dispatch log, in order
pub fn logged_commands(log: &Arc<Mutex<Vec<Dispatch>>>) -> Vec<String> {
    log.lock().unwrap().iter().map(|d| d.command.clone()).collect()
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &str,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput, RunnerError> {
        self.dispatched.lock().unwrap().push(Dispatch {
            command: command.to_string(),
            env: env.clone(),
        });

        let failure = self
            .failures
            .iter()
            .find(|(marker, _)| command.contains(marker));

        match failure {
            Some((_, exit_code)) => Ok(CommandOutput {
                exit_code: *exit_code,
                stdout: String::new(),
                stderr: "scripted failure".to_string(),
            }),
            None => Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

/// Execute a run against a scripted runner and return the report
pub async fn execute_with_runner(
    run: &mut PipelineRun,
    runner: ScriptedRunner,
    secrets: &dyn SecretStore,
) -> RunReport {
    let engine = ExecutionEngine::new(runner);
    engine.execute(run, secrets).await
}

/// Execute steps where every command succeeds and no secret is available
pub async fn execute_steps(
    steps: Vec<Step>,
    platform: Platform,
    trigger: TriggerKind,
) -> RunReport {
    let mut run = PipelineRun::new("test", platform, trigger, steps);
    execute_with_runner(&mut run, ScriptedRunner::succeeding(), &StaticSecretStore::empty()).await
}

/// Assert a step succeeded
pub fn assert_step_succeeded(report: &RunReport, step: &str) {
    let status = step_status(report, step);
    assert!(
        matches!(status, StepStatus::Succeeded { .. }),
        "step '{}' should have succeeded, but was: {:?}",
        step,
        status
    );
}

/// Assert a step was bypassed by a gate
pub fn assert_step_skipped(report: &RunReport, step: &str) {
    let status = step_status(report, step);
    assert!(
        matches!(status, StepStatus::Skipped { .. }),
        "step '{}' should have been skipped, but was: {:?}",
        step,
        status
    );
}

/// Assert a step failed
pub fn assert_step_failed(report: &RunReport, step: &str) {
    let status = step_status(report, step);
    assert!(
        matches!(status, StepStatus::Failed { .. }),
        "step '{}' should have failed, but was: {:?}",
        step,
        status
    );
}

/// Assert a step was never attempted
pub fn assert_step_pending(report: &RunReport, step: &str) {
    let status = step_status(report, step);
    assert!(
        matches!(status, StepStatus::Pending),
        "step '{}' should never have been attempted, but was: {:?}",
        step,
        status
    );
}

/// Look up a step's terminal status in a report
pub fn step_status<'a>(report: &'a RunReport, step: &str) -> &'a StepStatus {
    report
        .steps
        .iter()
        .find(|s| s.name == step)
        .map(|s| &s.status)
        .unwrap_or_else(|| panic!("step '{}' not found in report", step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry::core::RunStatus;

    #[tokio::test]
    async fn test_scripted_runner_records_dispatches() {
        let report = execute_steps(
            vec![Step::new("a", "run-a"), Step::new("b", "run-b")],
            Platform::Linux,
            TriggerKind::Push,
        )
        .await;

        assert_eq!(report.status, RunStatus::Completed);
        assert_step_succeeded(&report, "a");
        assert_step_succeeded(&report, "b");
    }

    #[tokio::test]
    async fn test_scripted_runner_failure_marker() {
        let mut run = PipelineRun::new(
            "test",
            Platform::Linux,
            TriggerKind::Push,
            vec![Step::new("broken", "will-break")],
        );
        let runner = ScriptedRunner::succeeding().fail_on("will-break", 7);
        let log = runner.dispatch_log();
        let report = execute_with_runner(&mut run, runner, &StaticSecretStore::empty()).await;

        assert_eq!(report.exit_code, 7);
        assert_step_failed(&report, "broken");
        assert_eq!(logged_commands(&log), vec!["will-break"]);
    }
}
