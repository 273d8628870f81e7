// ABOUTME: Idempotent container replacement using the type state pattern.
// ABOUTME: Exports state markers, targets, the deploy lock and deploy errors.

mod deployment;
mod error;
mod lock;
mod state;
mod target;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, DeployStep, LockHolderInfo};
pub use lock::{DeployLock, LockInfo};
pub use state::{Cleared, ImagePulled, Inspected, Planned, Started};
pub use target::{
    DeployReport, DeploymentTarget, TargetConnector, TargetRunner, replace,
};
