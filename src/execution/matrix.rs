//! Matrix fan-out - one independent run per platform

use crate::{
    core::{PipelineConfig, PipelineRun, Platform, TriggerKind},
    execution::engine::{EventHandler, ExecutionEngine, RunReport},
    runner::CommandRunner,
    secrets::SecretStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Reports from every matrix cell, in platform declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixReport {
    pub runs: Vec<RunReport>,
}

impl MatrixReport {
    /// Check if every run completed
    pub fn is_success(&self) -> bool {
        self.runs.iter().all(|r| r.is_success())
    }

    /// Exit code for the matrix: 0 when all runs completed, the first
    /// halted run's exit code otherwise
    pub fn exit_code(&self) -> i32 {
        self.runs
            .iter()
            .map(|r| r.exit_code)
            .find(|code| *code != 0)
            .unwrap_or(0)
    }
}

/// Execute one run per platform and collect the reports
///
/// Each platform gets its own `PipelineRun` built fresh from the
/// configuration - no state object is threaded between cells, so the runs
/// are safe to execute concurrently on independent workers. The runs are
/// order-insensitive relative to each other; only the ordering within each
/// run is guaranteed. A halted run does not cancel its siblings; sibling
/// cancellation is the surrounding orchestration's policy, not this
/// component's.
pub async fn run_matrix<R>(
    config: &PipelineConfig,
    platforms: &[Platform],
    trigger: TriggerKind,
    runner: Arc<R>,
    secrets: Arc<dyn SecretStore>,
    handler: Option<EventHandler>,
) -> MatrixReport
where
    R: CommandRunner + 'static,
{
    info!(
        "fanning out pipeline '{}' across {} platform(s)",
        config.name,
        platforms.len()
    );

    let mut tasks = Vec::with_capacity(platforms.len());
    for &platform in platforms {
        let mut run = PipelineRun::from_config(config, platform, trigger);
        let runner = runner.clone();
        let secrets = secrets.clone();
        let handler = handler.clone();

        tasks.push(tokio::spawn(async move {
            let mut engine = ExecutionEngine::with_shared(runner);
            if let Some(handler) = handler {
                engine.add_event_handler(move |event| handler(event));
            }
            engine.execute(&mut run, secrets.as_ref()).await
        }));
    }

    let mut runs = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(report) => runs.push(report),
            Err(e) => {
                // A panicked cell is a defect in the runner, not a gate
                // outcome; surface it loudly rather than dropping the cell.
                tracing::error!("matrix cell task failed: {}", e);
            }
        }
    }

    MatrixReport { runs }
}
