// ABOUTME: Execution error types with the SNAFU pattern.
// ABOUTME: Separates "could not start the process" from "the remote channel broke".

use snafu::Snafu;

/// A command that could not be run to completion.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExecError {
    #[snafu(display("failed to run `{program}`: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("remote shell error: {source}"))]
    Remote { source: crate::ssh::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    /// The local program is missing or not executable.
    Spawn,
    /// SSH transport or channel failure.
    Transport,
}

impl ExecError {
    pub fn kind(&self) -> ExecErrorKind {
        match self {
            ExecError::Spawn { .. } => ExecErrorKind::Spawn,
            ExecError::Remote { .. } => ExecErrorKind::Transport,
        }
    }
}

impl From<crate::ssh::Error> for ExecError {
    fn from(source: crate::ssh::Error) -> Self {
        ExecError::Remote { source }
    }
}
