// ABOUTME: Configuration resolution for a deployment invocation.
// ABOUTME: Merges the .env file with explicit parameters and loads deploy.yml settings.

mod env_file;
mod error;
mod init;
mod known_key;
mod params;
mod record;
mod remote;
mod restart_policy;
mod settings;

pub use env_file::EnvFile;
pub use error::ConfigError;
pub use init::init_settings;
pub use known_key::KnownKey;
pub use params::{
    BuildContext, DEFAULT_BUILD_CONTEXT, DEFAULT_CONTAINER_NAME, DEFAULT_IMAGE_NAME, DEFAULT_PORT,
    DEFAULT_SERVICE_URL, InvocationParams, Secret, TargetKind,
};
pub use record::{DeployConfig, EnvVars, Secrets, resolve};
pub use remote::{DEFAULT_REMOTE_HOST, DEFAULT_REMOTE_USER, RemoteHost};
pub use restart_policy::RestartPolicy;
pub use settings::{
    BuildSettings, DEFAULT_PLATFORM, DEFAULT_REGISTRY, SETTINGS_FILENAME, SETTINGS_FILENAME_ALT,
    SETTINGS_FILENAME_DIR, Settings,
};

/// Default location of the key/value configuration file.
pub const DEFAULT_ENV_FILE: &str = ".env";
