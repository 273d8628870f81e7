// ABOUTME: Error types for the deploy stage.
// ABOUTME: Same failure classes for both targets, tagged by where the command ran.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::exec::Origin;

/// Steps of the replace transition, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    Connect,
    Pull,
    Query,
    Stop,
    Remove,
    Start,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStep::Connect => "connection",
            DeployStep::Pull => "image pull",
            DeployStep::Query => "container query",
            DeployStep::Stop => "stop",
            DeployStep::Remove => "removal",
            DeployStep::Start => "start",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while replacing the service container.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A step failed against the local engine.
    #[error("{step} for container {container} failed: {detail}")]
    DeployFailed {
        step: DeployStep,
        container: String,
        detail: String,
    },

    /// A step failed on, or on the way to, the remote host.
    #[error("remote {step} for container {container} failed: {detail}")]
    RemoteExecutionFailed {
        step: DeployStep,
        container: String,
        detail: String,
    },

    /// The previous instance could not be stopped or removed.
    #[error("cleanup of previous container {container} failed: {detail}")]
    CleanupFailed { container: String, detail: String },

    /// Another deployment holds the lock.
    #[error("deploy lock held by {holder} (pid {pid}) since {started_at}")]
    LockHeld {
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    #[error("deploy lock error: {0}")]
    LockError(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    DeployFailed,
    RemoteExecutionFailed,
    CleanupFailed,
    LockHeld,
    LockError,
}

/// Holder details of a contended lock.
#[derive(Debug, Clone)]
pub struct LockHolderInfo {
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

impl DeployError {
    /// Failure of `step`, classified by where it ran.
    pub fn step_failed(
        origin: Origin,
        step: DeployStep,
        container: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let container = container.into();
        let detail = detail.into();
        match origin {
            Origin::Local => DeployError::DeployFailed {
                step,
                container,
                detail,
            },
            Origin::Remote => DeployError::RemoteExecutionFailed {
                step,
                container,
                detail,
            },
        }
    }

    pub fn lock_held(holder: String, pid: u32, started_at: DateTime<Utc>) -> Self {
        DeployError::LockHeld {
            holder,
            pid,
            started_at,
        }
    }

    pub fn lock_error(message: impl Into<String>) -> Self {
        DeployError::LockError(message.into())
    }

    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::DeployFailed { .. } => DeployErrorKind::DeployFailed,
            DeployError::RemoteExecutionFailed { .. } => DeployErrorKind::RemoteExecutionFailed,
            DeployError::CleanupFailed { .. } => DeployErrorKind::CleanupFailed,
            DeployError::LockHeld { .. } => DeployErrorKind::LockHeld,
            DeployError::LockError(_) => DeployErrorKind::LockError,
        }
    }

    /// The failed step, for command failures.
    pub fn step(&self) -> Option<DeployStep> {
        match self {
            DeployError::DeployFailed { step, .. }
            | DeployError::RemoteExecutionFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn lock_holder_info(&self) -> Option<LockHolderInfo> {
        match self {
            DeployError::LockHeld {
                holder,
                pid,
                started_at,
            } => Some(LockHolderInfo {
                holder: holder.clone(),
                pid: *pid,
                started_at: *started_at,
            }),
            _ => None,
        }
    }
}
