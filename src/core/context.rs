//! Run context - environment carried across the steps of one run

use crate::core::guard::{Platform, TriggerKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment state for one matrix run
///
/// Seeded from the (platform, trigger) pair and grown by the environment
/// assignments of executed steps; later steps observe everything earlier
/// steps exported. Each run owns its context; nothing is shared between
/// matrix siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Platform of this run
    pub platform: Platform,

    /// Trigger kind of this run
    pub trigger: TriggerKind,

    /// Environment variables visible to subsequent steps
    pub env: HashMap<String, String>,
}

impl RunContext {
    /// Create a context seeded with the platform and trigger variables
    pub fn new(platform: Platform, trigger: TriggerKind) -> Self {
        let mut env = HashMap::new();
        env.insert("GANTRY_PLATFORM".to_string(), platform.to_string());
        env.insert("GANTRY_TRIGGER".to_string(), trigger.to_string());

        Self {
            platform,
            trigger,
            env,
        }
    }

    /// Export a variable for the remainder of the run
    pub fn export(&mut self, key: String, value: String) {
        self.env.insert(key, value);
    }

    /// Apply a batch of environment assignments
    pub fn extend(&mut self, assignments: &HashMap<String, String>) {
        for (key, value) in assignments {
            self.env.insert(key.clone(), value.clone());
        }
    }

    /// Get a variable
    pub fn get(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }

    /// Substitute `${VAR}` references in a command from the context
    ///
    /// Unknown references are left intact for the runner's shell to resolve.
    pub fn render(&self, command: &str) -> String {
        let mut rendered = command.to_string();
        for (key, value) in &self.env {
            let reference = format!("${{{}}}", key);
            rendered = rendered.replace(&reference, value);
        }
        rendered
    }
}
