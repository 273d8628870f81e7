// ABOUTME: The resolved configuration record for one invocation.
// ABOUTME: Pure merge of defaults, configuration file and explicit parameters.

use super::params::{BuildContext, DEFAULT_SERVICE_URL, InvocationParams, Secret, TargetKind};
use super::{ConfigError, EnvFile, KnownKey};
use crate::types::{ContainerName, ImageRef};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment injected into the container. Sorted by key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvVars(BTreeMap<String, String>);

impl EnvVars {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for EnvVars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// The two credentials the service cannot start without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    api_key: Secret,
    jwt_secret: Secret,
}

impl Secrets {
    pub fn api_key(&self) -> &Secret {
        &self.api_key
    }

    pub fn jwt_secret(&self) -> &Secret {
        &self.jwt_secret
    }
}

/// Validated settings governing one deployment invocation.
///
/// Built once by [`resolve`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    image_name: String,
    container_name: ContainerName,
    secrets: Secrets,
    service_url: String,
    port: u16,
    build_context: BuildContext,
    target: TargetKind,
    env_vars: EnvVars,
}

/// Read the optional configuration file at `config_file` and merge it with `params`.
pub fn resolve(params: &InvocationParams, config_file: &Path) -> Result<DeployConfig, ConfigError> {
    let file = EnvFile::load(config_file)?;
    DeployConfig::from_sources(params, file.as_ref())
}

impl DeployConfig {
    /// Merge explicit parameters with an already-parsed configuration file.
    ///
    /// Precedence:
    /// * API key and signing secret: a non-empty explicit value wins, else the file.
    /// * Service URL: the file wins only while the explicit value is still the
    ///   built-in default.
    pub fn from_sources(
        params: &InvocationParams,
        file: Option<&EnvFile>,
    ) -> Result<Self, ConfigError> {
        let from_file = |key: KnownKey| {
            file.and_then(|f| f.known(key))
                .filter(|value| !value.is_empty())
        };

        let pick_secret = |explicit: Option<&Secret>, key: KnownKey| {
            explicit
                .filter(|s| !s.is_empty())
                .cloned()
                .or_else(|| from_file(key).map(Secret::new))
                .ok_or(ConfigError::MissingSecret(key))
        };

        let api_key = pick_secret(params.api_key.as_ref(), KnownKey::ApiKey)?;
        let jwt_secret = pick_secret(params.jwt_secret.as_ref(), KnownKey::JwtSecret)?;

        let service_url = if params.service_url == DEFAULT_SERVICE_URL {
            from_file(KnownKey::ServiceUrl).unwrap_or(DEFAULT_SERVICE_URL)
        } else {
            params.service_url.as_str()
        }
        .to_string();

        let container_name = ContainerName::new(&params.container_name)?;
        ImageRef::parse(&params.image_name)?;

        if params.port == 0 {
            return Err(ConfigError::InvalidPort(params.port));
        }

        let mut env: BTreeMap<String, String> = file
            .map(|f| {
                f.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        // Resolved values replace whatever the file said under the same names.
        for key in KnownKey::ALL {
            let value = match key {
                KnownKey::ApiKey => api_key.expose(),
                KnownKey::JwtSecret => jwt_secret.expose(),
                KnownKey::ServiceUrl => service_url.as_str(),
            };
            env.insert(key.env_name().to_string(), value.to_string());
        }

        Ok(Self {
            image_name: params.image_name.trim().to_string(),
            container_name,
            secrets: Secrets {
                api_key,
                jwt_secret,
            },
            service_url,
            port: params.port,
            build_context: params.build_context.clone(),
            target: params.target,
            env_vars: EnvVars(env),
        })
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn container_name(&self) -> &ContainerName {
        &self.container_name
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn build_context(&self) -> &BuildContext {
        &self.build_context
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    pub fn env_vars(&self) -> &EnvVars {
        &self.env_vars
    }

    /// Whether an environment entry must be masked when shown.
    ///
    /// Besides the two credentials, any file key that looks like a credential
    /// (`*KEY*`, `*SECRET*`, `*TOKEN*`, `*PASSWORD*`) is masked.
    pub fn is_sensitive(key: &str) -> bool {
        if KnownKey::from_env_name(key).is_some_and(KnownKey::is_secret) {
            return true;
        }
        let upper = key.to_ascii_uppercase();
        ["KEY", "SECRET", "TOKEN", "PASSWORD"]
            .iter()
            .any(|marker| upper.contains(marker))
    }
}
