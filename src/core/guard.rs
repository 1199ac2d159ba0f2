//! Guard predicates over platform and trigger kind

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system target of a matrix run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// All platforms, in matrix declaration order
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Macos, Platform::Windows];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Macos => "macos",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of event that triggered a run
///
/// Determines secret availability (fork pull requests never receive
/// repository secrets) and guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    Push,
    PullRequest,
    WorkflowCall,
}

impl TriggerKind {
    /// All trigger kinds
    pub const ALL: [TriggerKind; 3] = [
        TriggerKind::Push,
        TriggerKind::PullRequest,
        TriggerKind::WorkflowCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Push => "push",
            TriggerKind::PullRequest => "pull-request",
            TriggerKind::WorkflowCall => "workflow-call",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean predicate gating whether a step executes
///
/// Represented as data rather than code: an optional platform allow-list,
/// an optional trigger allow-list, and a list of denied (platform, trigger)
/// combinations. The default guard always passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guard {
    /// Platforms the step runs on (None = any)
    pub platforms: Option<Vec<Platform>>,

    /// Triggers the step runs on (None = any)
    pub triggers: Option<Vec<TriggerKind>>,

    /// Denied (platform, trigger) combinations
    pub unless: Vec<(Platform, TriggerKind)>,
}

impl Guard {
    /// Guard that passes for every (platform, trigger) pair
    pub fn always() -> Self {
        Guard::default()
    }

    /// Guard restricted to a single platform
    pub fn on_platform(platform: Platform) -> Self {
        Guard {
            platforms: Some(vec![platform]),
            ..Guard::default()
        }
    }

    /// Add a denied (platform, trigger) combination
    pub fn unless(mut self, platform: Platform, trigger: TriggerKind) -> Self {
        self.unless.push((platform, trigger));
        self
    }

    /// Evaluate the guard for a (platform, trigger) pair
    pub fn evaluate(&self, platform: Platform, trigger: TriggerKind) -> bool {
        if let Some(platforms) = &self.platforms {
            if !platforms.contains(&platform) {
                return false;
            }
        }

        if let Some(triggers) = &self.triggers {
            if !triggers.contains(&trigger) {
                return false;
            }
        }

        !self.unless.contains(&(platform, trigger))
    }
}
