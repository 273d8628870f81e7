// ABOUTME: Application-wide error type wrapping each stage's errors.
// ABOUTME: Names the failed stage and maps it to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::build::BuildError;
use crate::config::ConfigError;
use crate::deploy::DeployError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Exit status for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit status for failures outside the three pipeline stages.
pub const EXIT_OTHER: i32 = 1;
/// Exit status clap uses for invalid arguments, kept apart from the stage codes.
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_RESOLVE: i32 = 3;
pub const EXIT_BUILD: i32 = 4;
/// Shared by local and remote deploy failures.
pub const EXIT_DEPLOY: i32 = 5;

impl Error {
    /// Pipeline stage the error belongs to, for the one-line diagnostic.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config(_) => "resolve",
            Error::Build(_) => "build",
            Error::Deploy(_) => "deploy",
            Error::AlreadyExists(_) => "init",
            Error::InvalidSettings(_) | Error::Yaml(_) | Error::Io(_) => "settings",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => EXIT_RESOLVE,
            Error::Build(_) => EXIT_BUILD,
            Error::Deploy(_) => EXIT_DEPLOY,
            _ => EXIT_OTHER,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
