//! Runner environment for executing step commands

pub mod shell;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use shell::ShellRunner;

/// Errors raised while dispatching a command to the runner environment
///
/// These surface as step failures; the evaluator never conflates them with
/// gate skips.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("command terminated by signal")]
    Signalled,
}

/// Output captured from one command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Check if the command exited zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for the external runner environment - allows for different
/// implementations
///
/// The production implementation shells out; tests substitute a scripted
/// runner. Commands are opaque strings; the environment map carries the run
/// context plus any secrets the step declared.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute a command with the given environment and capture its result
    async fn run(
        &self,
        command: &str,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput, RunnerError>;
}
