// ABOUTME: Runs commands on the deployment host over an SSH session.
// ABOUTME: Each argument is shell-quoted before the line is transmitted.

use super::command::{CommandOutput, CommandSpec};
use super::error::{ExecError, RemoteSnafu};
use super::{CommandRunner, Origin};
use crate::ssh::Session;
use async_trait::async_trait;
use snafu::ResultExt;

/// Executes commands through an established [`Session`].
#[derive(Debug)]
pub struct RemoteRunner {
    session: Session,
}

impl RemoteRunner {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[async_trait]
impl CommandRunner for RemoteRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        tracing::debug!("exec ({}): {}", self.session.destination(), command);
        self.session.exec(&command.render()).await.context(RemoteSnafu)
    }

    fn origin(&self) -> Origin {
        Origin::Remote
    }

    async fn shutdown(&self) -> Result<(), ExecError> {
        self.session.disconnect().await.context(RemoteSnafu)
    }
}
