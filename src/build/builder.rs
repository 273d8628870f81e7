// ABOUTME: Runs the build stage against a command runner.
// ABOUTME: Ensures the named builder exists exactly once, then builds and pushes the image.

use super::error::{BuildError, BuildStep};
use super::strategy::BuildStrategy;
use crate::config::{BuildSettings, DeployConfig};
use crate::engine::EngineCli;
use crate::exec::{CommandRunner, CommandSpec};
use crate::types::ImageRef;

/// Whether the multi-platform builder had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderStatus {
    Existing,
    Created,
}

/// Result of a successful build stage.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Registry-qualified reference now present in the registry.
    pub image: ImageRef,
    pub strategy: BuildStrategy,
    /// Set for the multi-platform strategy.
    pub builder: Option<BuilderStatus>,
}

/// Builds and pushes the service image.
pub struct ImageBuilder<'a, R> {
    runner: &'a R,
    engine: EngineCli,
    registry: &'a str,
    settings: &'a BuildSettings,
}

impl<'a, R: CommandRunner> ImageBuilder<'a, R> {
    pub fn new(
        runner: &'a R,
        engine: EngineCli,
        registry: &'a str,
        settings: &'a BuildSettings,
    ) -> Self {
        Self {
            runner,
            engine,
            registry,
            settings,
        }
    }

    /// Reference the image is pushed to: `<registry>/<image name>`.
    pub fn target_image(&self, config: &DeployConfig) -> Result<ImageRef, BuildError> {
        Ok(ImageRef::qualified(self.registry, config.image_name())?)
    }

    /// Build and push. Performs no container lifecycle changes.
    pub async fn build(&self, config: &DeployConfig) -> Result<BuildOutcome, BuildError> {
        let image = self.target_image(config)?;
        let strategy = BuildStrategy::for_context(config.build_context());

        let builder = match &strategy {
            BuildStrategy::Simple => {
                tracing::info!("building {} with the default builder", image);
                self.run_step(BuildStep::Build, &self.engine.build(&image, self.settings))
                    .await?;
                self.run_step(BuildStep::Push, &self.engine.push(&image))
                    .await?;
                None
            }
            BuildStrategy::MultiPlatform { context, builder } => {
                if !self.engine.kind().supports_builders() {
                    return Err(BuildError::BuildersUnsupported {
                        engine: self.engine.kind(),
                    });
                }
                let status = self.ensure_builder(builder, context).await?;
                self.run_step(BuildStep::UseBuilder, &self.engine.use_builder(builder))
                    .await?;
                tracing::info!(
                    "building {} for {:?} on builder {}",
                    image,
                    self.settings.platforms,
                    builder
                );
                self.run_step(
                    BuildStep::BuildAndPush,
                    &self.engine.buildx_build_push(&image, self.settings),
                )
                .await?;
                Some(status)
            }
        };

        Ok(BuildOutcome {
            image,
            strategy,
            builder,
        })
    }

    /// Create the builder unless one with this name already exists.
    async fn ensure_builder(
        &self,
        builder: &str,
        context: &str,
    ) -> Result<BuilderStatus, BuildError> {
        let inspect = self
            .runner
            .run(&self.engine.inspect_builder(builder))
            .await
            .map_err(|e| BuildError::failed(BuildStep::CreateBuilder, e.to_string()))?;

        if inspect.success() {
            tracing::debug!("builder {} already exists", builder);
            return Ok(BuilderStatus::Existing);
        }

        tracing::info!("creating builder {} for context {}", builder, context);
        self.run_step(
            BuildStep::CreateBuilder,
            &self.engine.create_builder(builder, context),
        )
        .await?;
        Ok(BuilderStatus::Created)
    }

    async fn run_step(&self, step: BuildStep, command: &CommandSpec) -> Result<(), BuildError> {
        let output = self
            .runner
            .run(command)
            .await
            .map_err(|e| BuildError::failed(step, e.to_string()))?;

        if output.success() {
            Ok(())
        } else {
            Err(BuildError::failed(step, output.failure_detail()))
        }
    }
}
