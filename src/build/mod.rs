// ABOUTME: Image build and push stage.
// ABOUTME: Chooses between a plain local build and a multi-platform builder, then pushes.

mod builder;
mod error;
mod strategy;

pub use builder::{BuildOutcome, BuilderStatus, ImageBuilder};
pub use error::{BuildError, BuildStep};
pub use strategy::BuildStrategy;
