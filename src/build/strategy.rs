// ABOUTME: Build strategy selection from the requested build context.
// ABOUTME: "default" builds locally; any other context gets a named multi-platform builder.

use crate::config::BuildContext;
use sha2::{Digest, Sha256};

/// How the image is built and pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
    /// `build` then `push` with the engine's default builder.
    Simple,

    /// `buildx build --push` on a builder bound to `context`.
    MultiPlatform { context: String, builder: String },
}

impl BuildStrategy {
    pub fn for_context(context: &BuildContext) -> Self {
        match context {
            BuildContext::Default => BuildStrategy::Simple,
            BuildContext::Named(context) => BuildStrategy::MultiPlatform {
                context: context.clone(),
                builder: Self::builder_name(context),
            },
        }
    }

    /// Builder instance name for a context. Stable, so reruns find the same builder.
    ///
    /// The readable part only keeps `[A-Za-z0-9_-]`; the digest suffix of the raw
    /// context keeps contexts that differ in other characters apart.
    pub fn builder_name(context: &str) -> String {
        let sanitized: String = context
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let digest = format!("{:x}", Sha256::digest(context.as_bytes()));
        format!("simongpt-{}-{}", sanitized, &digest[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_simple() {
        assert_eq!(
            BuildStrategy::for_context(&BuildContext::Default),
            BuildStrategy::Simple
        );
    }

    #[test]
    fn named_context_gets_builder() {
        let strategy = BuildStrategy::for_context(&BuildContext::Named("arm-box".to_string()));
        assert_eq!(
            strategy,
            BuildStrategy::MultiPlatform {
                context: "arm-box".to_string(),
                builder: BuildStrategy::builder_name("arm-box"),
            }
        );
    }

    #[test]
    fn builder_name_is_sanitized() {
        let name = BuildStrategy::builder_name("ssh://ops@box");
        assert!(name.starts_with("simongpt-ssh---ops-box-"));
        assert_eq!(name.len(), "simongpt-ssh---ops-box-".len() + 8);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn builder_name_is_stable() {
        assert_eq!(
            BuildStrategy::builder_name("arm-box"),
            BuildStrategy::builder_name("arm-box")
        );
    }

    #[test]
    fn punctuation_variants_get_distinct_builders() {
        let dotted = BuildStrategy::builder_name("gpu.box");
        let dashed = BuildStrategy::builder_name("gpu-box");
        assert_ne!(dotted, dashed);
        assert!(dotted.starts_with("simongpt-gpu-box-"));
        assert!(dashed.starts_with("simongpt-gpu-box-"));
    }
}
