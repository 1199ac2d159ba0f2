//! Shell-backed command runner

use crate::runner::{CommandOutput, CommandRunner, RunnerError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::process::Command;
use tracing::debug;

/// Runner that dispatches commands to the platform shell
///
/// Uses `sh -c` on unix and `cmd /C` on Windows. The environment map is
/// appended to the inherited process environment, so exported install paths
/// and injected secrets are visible to the command without being echoed
/// anywhere.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(
        &self,
        command: &str,
        env: &HashMap<String, String>,
    ) -> Result<CommandOutput, RunnerError> {
        debug!("dispatching command: {}", command);

        let mut cmd = Self::shell_command(command);
        cmd.envs(env);

        let output = cmd.output().await?;
        let exit_code = output.status.code().ok_or(RunnerError::Signalled)?;

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
