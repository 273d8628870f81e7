// ABOUTME: Runs commands as child processes on this machine.
// ABOUTME: Used for image builds and for the local deployment target.

use super::command::{CommandOutput, CommandSpec};
use super::error::{ExecError, SpawnSnafu};
use super::{CommandRunner, Origin};
use async_trait::async_trait;
use snafu::ResultExt;
use std::process::Stdio;
use tokio::process::Command;

/// Executes commands with `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalRunner;

impl LocalRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        tracing::debug!("exec (local): {}", command);

        let mut process = Command::new(command.program());
        process.args(command.arg_values()).stdin(Stdio::null());

        if command.is_streaming() {
            let status = process
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .context(SpawnSnafu {
                    program: command.program(),
                })?;

            return Ok(CommandOutput {
                exit_code: status.code().unwrap_or(-1),
                stdout: String::new(),
                stderr: String::new(),
            });
        }

        let output = process
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu {
                program: command.program(),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn origin(&self) -> Origin {
        Origin::Local
    }
}
