//! Pipeline run domain model

use crate::core::{
    config::PipelineConfig,
    guard::{Platform, TriggerKind},
    state::{RunState, SkipReason, StepStatus},
    step::{GateOutcome, Step},
};
use crate::secrets::SecretStore;
use serde::{Deserialize, Serialize};

/// One independent execution of the full step sequence for a single
/// (platform, trigger) pair
///
/// Steps execute in exactly declaration order, strictly one after another.
/// Distinct platforms get distinct `PipelineRun` values with no shared
/// mutable state, so matrix siblings may execute on independent workers.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Pipeline name
    pub name: String,

    /// Platform of this run
    pub platform: Platform,

    /// Trigger kind of this run
    pub trigger: TriggerKind,

    /// Ordered steps
    pub steps: Vec<Step>,

    /// Run-level state
    pub state: RunState,
}

/// The evaluator's verdict for one step of a planned run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDecision {
    /// Step name
    pub step: String,

    /// Skip reason, `None` when the step would execute
    pub skip: Option<SkipReason>,
}

impl StepDecision {
    pub fn executes(&self) -> bool {
        self.skip.is_none()
    }
}

impl PipelineRun {
    /// Create a run from an ordered step list
    pub fn new(name: &str, platform: Platform, trigger: TriggerKind, steps: Vec<Step>) -> Self {
        PipelineRun {
            name: name.to_string(),
            platform,
            trigger,
            steps,
            state: RunState::new(),
        }
    }

    /// Instantiate a run for one matrix cell of a configuration
    pub fn from_config(config: &PipelineConfig, platform: Platform, trigger: TriggerKind) -> Self {
        Self::new(&config.name, platform, trigger, config.to_steps())
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Get a mutable step by name
    pub fn step_mut(&mut self, name: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.name == name)
    }

    /// Evaluate every step's gates without executing anything
    ///
    /// Pure function of (platform, trigger, steps, secret availability):
    /// evaluating the same inputs twice yields identical decisions.
    pub fn plan(&self, secrets: &dyn SecretStore) -> Vec<StepDecision> {
        self.steps
            .iter()
            .map(|step| {
                let skip = match step.gate(self.platform, self.trigger, secrets) {
                    GateOutcome::Execute => None,
                    GateOutcome::Skip(reason) => Some(reason),
                };
                StepDecision {
                    step: step.name.clone(),
                    skip,
                }
            })
            .collect()
    }

    /// Names of steps that executed (succeeded or failed), in order
    pub fn executed_steps(&self) -> Vec<&str> {
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

    /// Names of steps bypassed by a gate, in order
    pub fn skipped_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Skipped { .. }))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Check if every step reached a terminal state or was never attempted
    /// after a halt
    pub fn is_finished(&self) -> bool {
        self.state.finished_at.is_some()
    }
}
