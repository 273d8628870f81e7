// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::engine::{ContainerSpec, EngineCli, ExistingContainer};
use crate::types::{ContainerName, ImageRef};

use super::state::{Cleared, Inspected, Planned, Started};

/// A replace transition in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) spec: ContainerSpec,
    pub(crate) engine: EngineCli,
    pub(crate) state: S,
}

impl Deployment<Planned> {
    pub fn new(spec: ContainerSpec, engine: EngineCli) -> Self {
        Deployment {
            spec,
            engine,
            state: Planned,
        }
    }
}

impl<S> Deployment<S> {
    pub fn container_name(&self) -> &ContainerName {
        &self.spec.name
    }

    pub fn image(&self) -> &ImageRef {
        &self.spec.image
    }

    pub fn spec(&self) -> &ContainerSpec {
        &self.spec
    }
}

impl Deployment<Inspected> {
    /// Instances found under the container name. Empty on a first deployment.
    pub fn existing(&self) -> &[ExistingContainer] {
        &self.state.existing
    }
}

impl Deployment<Cleared> {
    /// Why cleanup of the previous instance failed, if it did.
    pub fn cleanup_failure(&self) -> Option<&str> {
        self.state.cleanup_failure.as_deref()
    }
}

impl Deployment<Started> {
    /// ID printed by the engine for the new container.
    pub fn container_id(&self) -> &str {
        &self.state.container_id
    }

    pub fn replaced(&self) -> &[ExistingContainer] {
        &self.state.replaced
    }
}
