// ABOUTME: Container name validation for the deployed service instance.
// ABOUTME: The name is the idempotency key used to find and replace a prior instance.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name must start with a letter or digit, found '{0}'")]
    InvalidStart(char),

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// Name of the single managed container.
///
/// Follows the engine rule `[a-zA-Z0-9][a-zA-Z0-9_.-]*`, so the value can be
/// embedded in an anchored name filter without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let mut chars = value.chars();

        let first = chars.next().ok_or(ContainerNameError::Empty)?;
        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::InvalidStart(first));
        }

        for c in chars {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Anchored filter expression matching exactly this container.
    /// Docker reports names with a leading slash, Podman without.
    pub fn name_filter(&self) -> String {
        format!("name=^/?{}$", self.0)
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_engine_style_names() {
        assert!(ContainerName::new("simongpt-llm-router").is_ok());
        assert!(ContainerName::new("Router_2.blue").is_ok());
    }

    #[test]
    fn rejects_leading_separator() {
        assert_eq!(
            ContainerName::new("-router"),
            Err(ContainerNameError::InvalidStart('-'))
        );
    }

    #[test]
    fn rejects_shell_metacharacters() {
        assert_eq!(
            ContainerName::new("router;rm"),
            Err(ContainerNameError::InvalidChar(';'))
        );
    }

    #[test]
    fn filter_is_anchored() {
        let name = ContainerName::new("router").unwrap();
        assert_eq!(name.name_filter(), "name=^/?router$");
    }
}
