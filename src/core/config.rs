//! Pipeline configuration from YAML

use crate::core::guard::{Guard, Platform, TriggerKind};
use crate::core::step::Step;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a pipeline configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed pipeline YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate step name: {0}")]
    DuplicateStep(String),

    #[error("step '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("pipeline '{0}' declares no steps")]
    NoSteps(String),

    #[error("step '{step}' has an unless pair for {platform} which its platform list excludes")]
    UnreachableUnless { step: String, platform: Platform },
}

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Pipeline version (optional)
    #[serde(default)]
    pub version: Option<String>,

    /// Ordered pipeline steps; execution order is exactly this order
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Step name, unique within the pipeline
    pub name: String,

    /// Command handed verbatim to the runner environment
    pub run: String,

    /// Platforms the step runs on (omitted = any)
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,

    /// Triggers the step runs on (omitted = any)
    #[serde(default)]
    pub triggers: Option<Vec<TriggerKind>>,

    /// Denied (platform, trigger) combinations
    #[serde(default)]
    pub unless: Vec<UnlessConfig>,

    /// Names of secrets the step requires
    #[serde(default)]
    pub secrets: Vec<String>,

    /// Environment assignments applied to the run context when the step
    /// executes
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// One denied (platform, trigger) combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlessConfig {
    pub platform: Platform,
    pub trigger: TriggerKind,
}

impl StepConfig {
    /// Build the guard predicate this config declares
    pub fn guard(&self) -> Guard {
        Guard {
            platforms: self.platforms.clone(),
            triggers: self.triggers.clone(),
            unless: self.unless.iter().map(|u| (u.platform, u.trigger)).collect(),
        }
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::NoSteps(self.name.clone()));
        }

        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if !seen.insert(&step.name) {
                return Err(ConfigError::DuplicateStep(step.name.clone()));
            }

            if step.run.trim().is_empty() {
                return Err(ConfigError::EmptyCommand(step.name.clone()));
            }

            // An unless pair whose platform the allow-list already excludes
            // can never fire; reject it as a declaration mistake.
            if let Some(platforms) = &step.platforms {
                for unless in &step.unless {
                    if !platforms.contains(&unless.platform) {
                        return Err(ConfigError::UnreachableUnless {
                            step: step.name.clone(),
                            platform: unless.platform,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Build the ordered step list this config declares
    pub fn to_steps(&self) -> Vec<Step> {
        self.steps.iter().map(Step::from_config).collect()
    }
}
