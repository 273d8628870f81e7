// ABOUTME: Container engine selection and CLI command construction.
// ABOUTME: Docker and Podman share the verbs used here; only the binary differs.

mod cli;
mod container;

pub use cli::{EngineCli, ExistingContainer, parse_container_list};
pub use container::{ContainerSpec, MANAGED_LABEL, IMAGE_LABEL};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The container engine CLI to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Docker,
    Podman,
}

impl EngineKind {
    pub fn binary(self) -> &'static str {
        match self {
            EngineKind::Docker => "docker",
            EngineKind::Podman => "podman",
        }
    }

    /// Whether `buildx` builder instances are available.
    pub fn supports_builders(self) -> bool {
        matches!(self, EngineKind::Docker)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}
