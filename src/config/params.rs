// ABOUTME: Explicit invocation parameters and their built-in defaults.
// ABOUTME: Also defines the build-context and deployment-target selectors.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_IMAGE_NAME: &str = "simongpt-llm-router";
pub const DEFAULT_CONTAINER_NAME: &str = "simongpt-llm-router";
pub const DEFAULT_SERVICE_URL: &str = "http://host.docker.internal:11434";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BUILD_CONTEXT: &str = "default";

/// A credential. Never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Which build strategy to use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildContext {
    /// Single-platform build with the local engine.
    #[default]
    Default,
    /// Multi-platform build on a builder bound to this engine context.
    Named(String),
}

impl FromStr for BuildContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("build context cannot be empty".to_string()),
            DEFAULT_BUILD_CONTEXT => Ok(BuildContext::Default),
            other if other.chars().any(char::is_whitespace) => {
                Err(format!("build context cannot contain whitespace: {}", other))
            }
            other => Ok(BuildContext::Named(other.to_string())),
        }
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildContext::Default => f.write_str(DEFAULT_BUILD_CONTEXT),
            BuildContext::Named(name) => f.write_str(name),
        }
    }
}

/// Where the container is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    #[default]
    Local,
    Remote,
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(TargetKind::Local),
            "remote" => Ok(TargetKind::Remote),
            other => Err(format!(
                "unknown deployment target: {} (expected local or remote)",
                other
            )),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Local => f.write_str("local"),
            TargetKind::Remote => f.write_str("remote"),
        }
    }
}

/// Parameters supplied on the command line.
///
/// `service_url` always carries a value; leaving it at
/// [`DEFAULT_SERVICE_URL`] is what lets the configuration file override it.
#[derive(Debug, Clone)]
pub struct InvocationParams {
    pub image_name: String,
    pub container_name: String,
    pub api_key: Option<Secret>,
    pub jwt_secret: Option<Secret>,
    pub service_url: String,
    pub port: u16,
    pub build_context: BuildContext,
    pub target: TargetKind,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            api_key: None,
            jwt_secret: None,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            port: DEFAULT_PORT,
            build_context: BuildContext::Default,
            target: TargetKind::Local,
        }
    }
}
