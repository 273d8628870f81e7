// ABOUTME: Image reference parsing and registry qualification.
// ABOUTME: Produces the `<registry>/<image>[:tag]` reference that is pushed and later pulled.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("image repository must be lowercase: {0}")]
    NotLowercase(String),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !"/:.-_".contains(*c))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        // A colon after the last slash separates the tag; earlier colons
        // belong to a registry port.
        let (without_tag, tag) = match input.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => (before, Some(after)),
            _ => (input, None),
        };

        if tag.is_some_and(str::is_empty) {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        let (registry, name) = match without_tag.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first), rest)
            }
            _ => (None, without_tag),
        };

        if name.is_empty() || name.starts_with('/') || name.ends_with('/') {
            return Err(ParseImageRefError::InvalidFormat(input.to_string()));
        }

        if name.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ParseImageRefError::NotLowercase(name.to_string()));
        }

        Ok(Self {
            registry: registry.map(str::to_string),
            name: name.to_string(),
            tag: tag.map(str::to_string),
        })
    }

    /// Qualify a local image name with a registry host.
    pub fn qualified(registry: &str, image: &str) -> Result<Self, ParseImageRefError> {
        let registry = registry.trim().trim_end_matches('/');
        if registry.is_empty() {
            return Self::parse(image);
        }
        let mut parsed = Self::parse(&format!("{}/{}", registry, image.trim()))?;
        // Registries without a dot or port are still the registry here.
        if parsed.registry.is_none() {
            parsed.registry = Some(registry.to_string());
            parsed.name = image.trim().split(':').next().unwrap_or_default().to_string();
        }
        Ok(parsed)
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        Ok(())
    }
}
