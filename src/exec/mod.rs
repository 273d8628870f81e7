// ABOUTME: Process-execution abstraction shared by the build and deploy stages.
// ABOUTME: Structured command lines run locally, over SSH, or recorded for a dry run.

mod command;
mod dry_run;
mod error;
mod local;
mod remote;

pub use command::{CommandOutput, CommandSpec, quote};
pub use dry_run::DryRunRunner;
pub use error::{ExecError, ExecErrorKind, RemoteSnafu, SpawnSnafu};
pub use local::LocalRunner;
pub use remote::RemoteRunner;

use async_trait::async_trait;
use std::fmt;

/// Where a runner executes its commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Local => write!(f, "local"),
            Origin::Remote => write!(f, "remote"),
        }
    }
}

/// Runs one command to completion and reports its exit status and output.
///
/// A non-zero exit is not an error at this layer; callers decide what a
/// failing step means. `Err` is reserved for commands that could not be run
/// at all (spawn failure, broken transport).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError>;

    /// Where commands run, used to classify failures.
    fn origin(&self) -> Origin;

    /// Release any connection held by the runner.
    async fn shutdown(&self) -> Result<(), ExecError> {
        Ok(())
    }
}

