// ABOUTME: Errors raised while resolving the configuration record.
// ABOUTME: All of them abort the run before any build or deploy command is issued.

use super::KnownKey;
use crate::types::{ContainerNameError, ParseImageRefError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required secret {0}")]
    MissingSecret(KnownKey),

    #[error("invalid container name: {0}")]
    InvalidContainerName(#[from] ContainerNameError),

    #[error("invalid image name: {0}")]
    InvalidImage(#[from] ParseImageRefError),

    #[error("invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
