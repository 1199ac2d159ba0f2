//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Overall status of a single matrix run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Run is currently executing steps
    InProgress,
    /// Every non-skipped step succeeded
    Completed,
    /// A step failed and the run stopped at it
    Halted,
}

/// Why a step was skipped rather than executed
///
/// Skips are an expected configuration state, never an error. They do not
/// affect the run's exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The step's guard evaluated false for this (platform, trigger) pair
    GuardFalse,
    /// A required secret is unavailable in the current trigger context
    MissingSecret(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::GuardFalse => write!(f, "guard evaluated false"),
            SkipReason::MissingSecret(name) => write!(f, "secret {} unavailable", name),
        }
    }
}

/// State of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Step has not been reached yet
    Pending,
    /// Step is currently running
    Running { started_at: DateTime<Utc> },
    /// Step was bypassed by a gate
    Skipped { reason: SkipReason },
    /// Step's command exited zero
    Succeeded {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
    /// Step's command exited non-zero or could not be dispatched
    Failed {
        exit_code: Option<i32>,
        error: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
}

impl StepStatus {
    /// Check if the step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded { .. } | StepStatus::Failed { .. } | StepStatus::Skipped { .. }
        )
    }
}

/// Mutable state of one matrix run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub run_id: Uuid,

    /// Current run status
    pub status: RunStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or halted
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of steps that executed (succeeded or failed)
    pub executed_steps: usize,

    /// Number of steps bypassed by a gate
    pub skipped_steps: usize,

    /// Run exit code: 0 on completion, the failing step's exit code on halt
    pub exit_code: Option<i32>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Pending,
            started_at: None,
            finished_at: None,
            executed_steps: 0,
            skipped_steps: 0,
            exit_code: None,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        self.status = RunStatus::InProgress;
        self.started_at = Some(Utc::now());
    }

    /// Mark the run as completed (all non-skipped steps succeeded)
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.exit_code = Some(0);
    }

    /// Mark the run as halted at a failed step
    pub fn halt(&mut self, exit_code: i32) {
        self.status = RunStatus::Halted;
        self.finished_at = Some(Utc::now());
        self.exit_code = Some(exit_code);
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
