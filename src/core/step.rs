//! Step domain model

use crate::core::{
    config::StepConfig,
    guard::{Guard, Platform, TriggerKind},
    state::{SkipReason, StepStatus},
};
use crate::secrets::SecretStore;
use std::collections::HashMap;

/// A single step in a pipeline run
#[derive(Debug, Clone)]
pub struct Step {
    /// Step name, unique within the pipeline
    pub name: String,

    /// Opaque command handed to the runner environment
    pub command: String,

    /// Guard predicate over (platform, trigger)
    pub guard: Guard,

    /// Names of secrets this step requires (may be empty)
    pub secrets: Vec<String>,

    /// Environment assignments applied to the run context when this step
    /// executes, and visible to every later step
    pub env: HashMap<String, String>,

    /// Runtime state (not part of the declaration)
    pub status: StepStatus,
}

/// The gate's verdict for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Both gates passed; the command is dispatched to the runner
    Execute,
    /// One of the gates closed; the step is bypassed, not failed
    Skip(SkipReason),
}

impl Step {
    /// Create a step with no guard, no secrets and no env assignments
    pub fn new(name: &str, command: &str) -> Self {
        Step {
            name: name.to_string(),
            command: command.to_string(),
            guard: Guard::always(),
            secrets: Vec::new(),
            env: HashMap::new(),
            status: StepStatus::Pending,
        }
    }

    /// Create a step from a step config
    pub fn from_config(config: &StepConfig) -> Self {
        Step {
            name: config.name.clone(),
            command: config.run.clone(),
            guard: config.guard(),
            secrets: config.secrets.clone(),
            env: config.env.clone(),
            status: StepStatus::Pending,
        }
    }

    /// Replace the guard, builder style
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Require a named secret, builder style
    pub fn with_secret(mut self, name: &str) -> Self {
        self.secrets.push(name.to_string());
        self
    }

    /// Declare an environment assignment, builder style
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Evaluate the guard predicate for a (platform, trigger) pair
    pub fn guard_passes(&self, platform: Platform, trigger: TriggerKind) -> bool {
        self.guard.evaluate(platform, trigger)
    }

    /// First required secret that is unavailable, if any
    pub fn missing_secret(&self, secrets: &dyn SecretStore) -> Option<&str> {
        self.secrets
            .iter()
            .find(|name| !secrets.available(name))
            .map(|name| name.as_str())
    }

    /// Gate the step for a (platform, trigger) pair and secret context
    ///
    /// The secret gate and the guard are independent checks: a step may be
    /// skipped for a missing secret on a trigger its guard allows, and vice
    /// versa. The secret gate is consulted first.
    pub fn gate(
        &self,
        platform: Platform,
        trigger: TriggerKind,
        secrets: &dyn SecretStore,
    ) -> GateOutcome {
        if let Some(name) = self.missing_secret(secrets) {
            return GateOutcome::Skip(SkipReason::MissingSecret(name.to_string()));
        }

        if !self.guard_passes(platform, trigger) {
            return GateOutcome::Skip(SkipReason::GuardFalse);
        }

        GateOutcome::Execute
    }
}
