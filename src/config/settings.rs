// ABOUTME: Deployment settings loaded from deploy.yml.
// ABOUTME: Registry host, engine, remote host, build inputs and restart policy, all with defaults.

use super::{RemoteHost, RestartPolicy};
use crate::engine::EngineKind;
use crate::error::{Error, Result};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILENAME: &str = "deploy.yml";
pub const SETTINGS_FILENAME_ALT: &str = "deploy.yaml";
pub const SETTINGS_FILENAME_DIR: &str = ".simongpt/deploy.yml";

pub const DEFAULT_REGISTRY: &str = "registry.simongpt.internal:5000";
pub const DEFAULT_PLATFORM: &str = "linux/amd64";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_registry")]
    pub registry: String,

    #[serde(default)]
    pub engine: EngineKind,

    #[serde(default, deserialize_with = "deserialize_remote")]
    pub remote: RemoteHost,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub restart: RestartPolicy,
}

/// Inputs to the image build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildSettings {
    /// Build context directory.
    #[serde(default = "default_build_path")]
    pub path: PathBuf,

    /// Dockerfile, relative to the working directory. Engine default when unset.
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    /// Target platforms for the multi-platform builder path.
    #[serde(
        default = "default_platforms",
        deserialize_with = "deserialize_platforms"
    )]
    pub platforms: NonEmpty<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            path: default_build_path(),
            dockerfile: None,
            platforms: default_platforms(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            engine: EngineKind::default(),
            remote: RemoteHost::default(),
            build: BuildSettings::default(),
            restart: RestartPolicy::default(),
        }
    }
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_build_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_platforms() -> NonEmpty<String> {
    NonEmpty::new(DEFAULT_PLATFORM.to_string())
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("loading settings from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(SETTINGS_FILENAME),
            dir.join(SETTINGS_FILENAME_ALT),
            dir.join(SETTINGS_FILENAME_DIR),
        ];

        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no settings file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(Error::InvalidSettings("registry cannot be empty".to_string()));
        }
        if let Some(platform) = self.build.platforms.iter().find(|p| !p.contains('/')) {
            return Err(Error::InvalidSettings(format!(
                "platform must look like os/arch: {}",
                platform
            )));
        }
        Ok(())
    }
}

fn deserialize_remote<'de, D>(deserializer: D) -> std::result::Result<RemoteHost, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match RemoteEntry::deserialize(deserializer)? {
        RemoteEntry::Simple(s) => RemoteHost::parse(&s).map_err(serde::de::Error::custom),
        RemoteEntry::Detailed(remote) => Ok(remote),
    }
}

fn deserialize_platforms<'de, D>(deserializer: D) -> std::result::Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("at least one platform is required"))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteEntry {
    Simple(String),
    Detailed(RemoteHost),
}
