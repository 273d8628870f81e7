// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state only offers the next step of the replace transition.

use crate::engine::ExistingContainer;

/// Nothing done yet.
/// Available actions: `pull_image()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Image present on the target.
/// Available actions: `inspect()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePulled;

/// Prior instances with the container name are known.
/// Available actions: `clear()`
#[derive(Debug, Clone)]
pub struct Inspected {
    pub(crate) existing: Vec<ExistingContainer>,
}

/// Prior instances stopped and removed (best effort).
/// Available actions: `start()`
#[derive(Debug, Clone)]
pub struct Cleared {
    pub(crate) replaced: Vec<ExistingContainer>,
    pub(crate) cleanup_failure: Option<String>,
}

/// New instance running.
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) container_id: String,
    pub(crate) replaced: Vec<ExistingContainer>,
}
