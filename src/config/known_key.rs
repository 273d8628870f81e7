// ABOUTME: The configuration-file keys the resolver gives special meaning to.
// ABOUTME: Maps file key names to their role instead of matching on raw strings.

use std::fmt;

/// A recognized configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownKey {
    /// Key clients present to obtain tokens from the router.
    ApiKey,
    /// Secret the router signs tokens with.
    JwtSecret,
    /// Upstream model server the router must reach.
    ServiceUrl,
}

impl KnownKey {
    pub const ALL: [KnownKey; 3] = [KnownKey::ApiKey, KnownKey::JwtSecret, KnownKey::ServiceUrl];

    /// Environment variable name, as used in the file and inside the container.
    pub fn env_name(self) -> &'static str {
        match self {
            KnownKey::ApiKey => "LLM_ROUTER_API_KEY",
            KnownKey::JwtSecret => "JWT_SECRET_KEY",
            KnownKey::ServiceUrl => "OLLAMA_URL",
        }
    }

    pub fn from_env_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.env_name() == name)
    }

    /// Whether the value must never appear in logs.
    pub fn is_secret(self) -> bool {
        matches!(self, KnownKey::ApiKey | KnownKey::JwtSecret)
    }
}

impl fmt::Display for KnownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}
