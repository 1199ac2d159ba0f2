//! Main execution engine - runs one matrix cell top to bottom

use crate::{
    core::{
        GateOutcome, PipelineRun, RunContext, RunStatus, SkipReason, StepStatus,
    },
    runner::CommandRunner,
    secrets::SecretStore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Events that occur during a run
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        run_id: Uuid,
        pipeline: String,
        platform: String,
        trigger: String,
    },
    StepStarted {
        step: String,
    },
    StepSkipped {
        step: String,
        reason: SkipReason,
    },
    StepSucceeded {
        step: String,
    },
    StepFailed {
        step: String,
        exit_code: Option<i32>,
        error: String,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
        exit_code: i32,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RunEvent) + Send + Sync>;

/// Final report for one matrix run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline: String,
    pub platform: String,
    pub trigger: String,
    pub status: RunStatus,
    /// 0 if all non-skipped steps succeeded, the failing step's exit code
    /// otherwise
    pub exit_code: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepReport>,
}

/// Terminal state of one step within a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
}

impl RunReport {
    /// Names of steps that executed, in declaration order
    pub fn executed(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| {
                matches!(
                    s.status,
                    StepStatus::Succeeded { .. } | StepStatus::Failed { .. }
                )
            })
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Names of steps bypassed by a gate, in declaration order
    pub fn skipped(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Skipped { .. }))
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Executes the steps of one `PipelineRun` strictly in declaration order
///
/// Per step: the secret gate and the guard are evaluated independently; a
/// closed gate skips the step silently. An executed step that exits non-zero
/// halts the run immediately - no retry, no partial continuation. Skips
/// never affect the exit code.
pub struct ExecutionEngine<R> {
    runner: Arc<R>,
    handlers: Vec<EventHandler>,
}

impl<R: CommandRunner + 'static> ExecutionEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner: Arc::new(runner),
            handlers: Vec::new(),
        }
    }

    /// Build an engine around an already-shared runner
    pub fn with_shared(runner: Arc<R>) -> Self {
        Self {
            runner,
            handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(RunEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: RunEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }

    /// Execute the run top to bottom and produce its report
    pub async fn execute(
        &self,
        run: &mut PipelineRun,
        secrets: &dyn SecretStore,
    ) -> RunReport {
        let run_id = run.state.run_id;
        info!(
            "starting run: {} [{} / {}] ({})",
            run.name, run.platform, run.trigger, run_id
        );

        run.state.start();
        self.emit(RunEvent::RunStarted {
            run_id,
            pipeline: run.name.clone(),
            platform: run.platform.to_string(),
            trigger: run.trigger.to_string(),
        });

        let mut context = RunContext::new(run.platform, run.trigger);
        let mut halt_code: Option<i32> = None;

        for index in 0..run.steps.len() {
            let step = run.steps[index].clone();

            match step.gate(run.platform, run.trigger, secrets) {
                GateOutcome::Skip(reason) => {
                    info!("skipping step '{}': {}", step.name, reason);
                    run.steps[index].status = StepStatus::Skipped {
                        reason: reason.clone(),
                    };
                    run.state.skipped_steps += 1;
                    self.emit(RunEvent::StepSkipped {
                        step: step.name.clone(),
                        reason,
                    });
                    continue;
                }
                GateOutcome::Execute => {}
            }

            let started_at = Utc::now();
            run.steps[index].status = StepStatus::Running { started_at };
            self.emit(RunEvent::StepStarted {
                step: step.name.clone(),
            });

            // Declared assignments become visible to this and every later
            // step.
            context.extend(&step.env);
            let command = context.render(&step.command);
            debug!("step '{}' command: {}", step.name, command);

            // Secrets ride along in the command's environment only; they
            // are never exported to the context and never logged.
            let mut env = context.env.clone();
            for name in &step.secrets {
                if let Some(value) = secrets.lookup(name) {
                    env.insert(name.clone(), value);
                }
            }

            let outcome = self.runner.run(&command, &env).await;
            let finished_at = Utc::now();
            run.state.executed_steps += 1;

            match outcome {
                Ok(output) if output.success() => {
                    info!("step '{}' succeeded", step.name);
                    run.steps[index].status = StepStatus::Succeeded {
                        started_at,
                        finished_at,
                    };
                    self.emit(RunEvent::StepSucceeded {
                        step: step.name.clone(),
                    });
                }
                Ok(output) => {
                    let error = failure_summary(&output.stderr, &output.stdout);
                    warn!(
                        "step '{}' failed with exit code {}",
                        step.name, output.exit_code
                    );
                    run.steps[index].status = StepStatus::Failed {
                        exit_code: Some(output.exit_code),
                        error: error.clone(),
                        started_at,
                        finished_at,
                    };
                    self.emit(RunEvent::StepFailed {
                        step: step.name.clone(),
                        exit_code: Some(output.exit_code),
                        error,
                    });
                    halt_code = Some(output.exit_code);
                }
                Err(e) => {
                    let error = e.to_string();
                    error!("step '{}' could not be dispatched: {}", step.name, error);
                    run.steps[index].status = StepStatus::Failed {
                        exit_code: None,
                        error: error.clone(),
                        started_at,
                        finished_at,
                    };
                    self.emit(RunEvent::StepFailed {
                        step: step.name.clone(),
                        exit_code: None,
                        error,
                    });
                    halt_code = Some(1);
                }
            }

            // Fail fast: the first failed step ends the run; later steps
            // are never attempted.
            if halt_code.is_some() {
                break;
            }
        }

        match halt_code {
            Some(code) => run.state.halt(code),
            None => run.state.complete(),
        }

        let exit_code = run.state.exit_code.unwrap_or(0);
        info!(
            "run finished: {} [{}] - {:?} (exit {})",
            run.name, run.platform, run.state.status, exit_code
        );
        self.emit(RunEvent::RunFinished {
            run_id,
            status: run.state.status,
            exit_code,
        });

        build_report(run)
    }
}

/// Condense command output into a one-line failure summary
fn failure_summary(stderr: &str, stdout: &str) -> String {
    let last_line = |text: &str| {
        text.lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
    };

    last_line(stderr)
        .or_else(|| last_line(stdout))
        .unwrap_or_else(|| "command exited non-zero".to_string())
}

/// Build the final report from a finished run
pub fn build_report(run: &PipelineRun) -> RunReport {
    RunReport {
        run_id: run.state.run_id,
        pipeline: run.name.clone(),
        platform: run.platform.to_string(),
        trigger: run.trigger.to_string(),
        status: run.state.status,
        exit_code: run.state.exit_code.unwrap_or(0),
        started_at: run.state.started_at,
        finished_at: run.state.finished_at,
        steps: run
            .steps
            .iter()
            .map(|s| StepReport {
                name: s.name.clone(),
                status: s.status.clone(),
            })
            .collect(),
    }
}
