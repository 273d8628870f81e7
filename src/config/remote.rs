// ABOUTME: Address and credentials of the remote deployment host.
// ABOUTME: Parses formats like "host", "user@host", "host:port", "user@host:port".

use crate::ssh::SessionConfig;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_REMOTE_USER: &str = "deploy";
pub const DEFAULT_REMOTE_HOST: &str = "simongpt.internal";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteHost {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,
    #[serde(default)]
    pub trust_first_connection: bool,
}

fn default_port() -> u16 {
    22
}

fn default_user() -> String {
    DEFAULT_REMOTE_USER.to_string()
}

impl Default for RemoteHost {
    fn default() -> Self {
        Self {
            host: DEFAULT_REMOTE_HOST.to_string(),
            port: default_port(),
            user: default_user(),
            key_path: None,
            known_hosts_path: None,
            trust_first_connection: false,
        }
    }
}

impl RemoteHost {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("remote address cannot be empty".to_string());
        }

        let (user, rest) = match s.split_once('@') {
            Some(("", _)) => return Err("user cannot be empty".to_string()),
            Some((user, rest)) => (user.to_string(), rest),
            None => (default_user(), s),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port: {}", port))?;
                (host, port)
            }
            None => (rest, default_port()),
        };

        if host.is_empty() {
            return Err("hostname cannot be empty".to_string());
        }

        Ok(RemoteHost {
            host: host.to_string(),
            port,
            user,
            ..Default::default()
        })
    }

    /// SSH session settings for this host.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(&self.host, &self.user)
            .port(self.port)
            .trust_on_first_use(self.trust_first_connection);
        if let Some(ref key) = self.key_path {
            config = config.key_path(key);
        }
        if let Some(ref known_hosts) = self.known_hosts_path {
            config = config.known_hosts_path(known_hosts);
        }
        config
    }
}
