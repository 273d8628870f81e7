// ABOUTME: Runner that prints and records commands instead of executing them.
// ABOUTME: Backs the --dry-run flag; every command "succeeds" with empty output.

use super::command::{CommandOutput, CommandSpec};
use super::error::ExecError;
use super::{CommandRunner, Origin};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every command it is asked to run.
///
/// Clones share the same log, so one recorder can stand in for both the
/// build and the deploy runner.
#[derive(Debug, Clone)]
pub struct DryRunRunner {
    origin: Origin,
    echo: bool,
    log: Arc<Mutex<Vec<CommandSpec>>>,
}

impl DryRunRunner {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            echo: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Print each command (redacted) to stdout as it is recorded.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Same log, different reported origin.
    pub fn with_origin(&self, origin: Origin) -> Self {
        Self {
            origin,
            echo: self.echo,
            log: Arc::clone(&self.log),
        }
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        if self.echo {
            println!("[dry-run:{}] {}", self.origin, command);
        }
        tracing::debug!("dry-run ({}): {}", self.origin, command);
        self.log.lock().push(command.clone());

        Ok(CommandOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn origin(&self) -> Origin {
        self.origin
    }
}
