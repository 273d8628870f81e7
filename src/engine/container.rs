// ABOUTME: Description of the container to start for the service.
// ABOUTME: Built from the resolved configuration record and the pushed image reference.

use crate::config::{DeployConfig, RestartPolicy};
use crate::types::{ContainerName, ImageRef};

/// Label marking containers started by this tool.
pub const MANAGED_LABEL: &str = "simongpt.deploy.managed";
/// Label recording the image reference a container was started from.
pub const IMAGE_LABEL: &str = "simongpt.deploy.image";

/// Everything `run` needs to start the service container.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: ContainerName,
    pub image: ImageRef,
    /// Published on the same number on host and container.
    pub port: u16,
    pub env: Vec<(String, String)>,
    pub restart: RestartPolicy,
    pub labels: Vec<(String, String)>,
}

impl ContainerSpec {
    pub fn from_config(config: &DeployConfig, image: &ImageRef, restart: RestartPolicy) -> Self {
        Self {
            name: config.container_name().clone(),
            image: image.clone(),
            port: config.port(),
            env: config
                .env_vars()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            restart,
            labels: vec![
                (MANAGED_LABEL.to_string(), "true".to_string()),
                (IMAGE_LABEL.to_string(), image.to_string()),
            ],
        }
    }
}
