// ABOUTME: Error types for the build stage.
// ABOUTME: Every failing step maps to BuildFailed; no deploy action follows one.

use crate::engine::EngineKind;
use crate::types::ParseImageRefError;
use std::fmt;

/// Steps of the build stage, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Build,
    Push,
    CreateBuilder,
    UseBuilder,
    BuildAndPush,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStep::Build => "image build",
            BuildStep::Push => "image push",
            BuildStep::CreateBuilder => "builder creation",
            BuildStep::UseBuilder => "builder selection",
            BuildStep::BuildAndPush => "multi-platform build and push",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{step} failed: {detail}")]
    BuildFailed { step: BuildStep, detail: String },

    #[error("{engine} has no builder instances; use build context \"default\"")]
    BuildersUnsupported { engine: EngineKind },

    #[error("invalid image reference: {0}")]
    InvalidImage(#[from] ParseImageRefError),
}

impl BuildError {
    pub(crate) fn failed(step: BuildStep, detail: impl Into<String>) -> Self {
        BuildError::BuildFailed {
            step,
            detail: detail.into(),
        }
    }

    /// The step that failed, if a command failed.
    pub fn step(&self) -> Option<BuildStep> {
        match self {
            BuildError::BuildFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}
