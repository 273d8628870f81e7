// ABOUTME: Validated domain types shared by the build and deploy stages.
// ABOUTME: Registry-qualified image references and container names.

mod container_name;
mod image_ref;

pub use container_name::{ContainerName, ContainerNameError};
pub use image_ref::{ImageRef, ParseImageRefError};
