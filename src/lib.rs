//! gantry - a matrix CI gate evaluator and step runner

pub mod cli;
pub mod core;
pub mod execution;
pub mod runner;
pub mod secrets;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GateOutcome, Guard, PipelineConfig, PipelineRun, Platform, RunContext, RunState,
    RunStatus, SkipReason, Step, StepDecision, StepStatus, TriggerKind,
};
pub use execution::{run_matrix, ExecutionEngine, MatrixReport, RunEvent, RunReport};
pub use runner::{CommandOutput, CommandRunner, RunnerError, ShellRunner};
pub use secrets::{EnvSecretStore, SecretStore, StaticSecretStore};
