// ABOUTME: Top-level pipeline: resolve configuration, build and push, then replace the container.
// ABOUTME: Each stage fails fast; non-fatal problems are collected as diagnostics.

use std::path::Path;

use crate::build::{BuildOutcome, ImageBuilder};
use crate::config::{DeployConfig, InvocationParams, Settings, resolve};
use crate::deploy::{DeployError, DeployLock, DeployReport, TargetConnector, replace};
use crate::diagnostics::{Diagnostics, Warning};
use crate::engine::{ContainerSpec, EngineCli};
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::output::Output;
use crate::types::ImageRef;

/// Behaviour switches that are not part of the configuration record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Hold a per-container lock on the target while replacing.
    pub lock: bool,
    /// Break an existing lock. Implies `lock`.
    pub force_lock: bool,
}

impl RunOptions {
    fn locking(&self) -> bool {
        self.lock || self.force_lock
    }
}

/// Everything a full run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub config: DeployConfig,
    pub build: BuildOutcome,
    pub deploy: DeployReport,
    pub warnings: Vec<Warning>,
}

/// Sequences the stages for one invocation.
pub struct Orchestrator<'a> {
    settings: &'a Settings,
    output: &'a Output,
    options: RunOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(settings: &'a Settings, output: &'a Output, options: RunOptions) -> Self {
        Self {
            settings,
            output,
            options,
        }
    }

    fn engine(&self) -> EngineCli {
        EngineCli::new(self.settings.engine)
    }

    /// Resolve the configuration record. Nothing is executed.
    pub fn resolve(&self, params: &InvocationParams, env_file: &Path) -> Result<DeployConfig> {
        let config = resolve(params, env_file)?;
        tracing::debug!("resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Build and push the image. No container is touched.
    pub async fn build<R: CommandRunner>(
        &self,
        config: &DeployConfig,
        runner: &R,
    ) -> Result<BuildOutcome> {
        let builder = ImageBuilder::new(
            runner,
            self.engine(),
            &self.settings.registry,
            &self.settings.build,
        );
        self.output.progress(
            "build",
            &format!(
                "building {} (context {})",
                builder.target_image(config)?,
                config.build_context()
            ),
        );
        let outcome = builder.build(config).await?;
        self.output
            .progress("build", &format!("pushed {}", outcome.image));
        Ok(outcome)
    }

    /// Connect to the target, then replace the service container with one
    /// started from `image`. The connection is closed whatever the outcome.
    pub async fn deploy<C: TargetConnector>(
        &self,
        config: &DeployConfig,
        image: &ImageRef,
        connector: &C,
        diag: &mut Diagnostics,
    ) -> Result<DeployReport> {
        self.output.progress(
            "deploy",
            &format!(
                "replacing container {} on {} target",
                config.container_name(),
                config.target()
            ),
        );
        let runner = connector.connect(config).await?;

        let result = self.deploy_with(&runner, config, image, diag).await;

        if let Err(e) = runner.shutdown().await {
            diag.warn(Warning::ssh_disconnect(format!("disconnect failed: {}", e)));
        }

        Ok(result?)
    }

    async fn deploy_with<R: CommandRunner>(
        &self,
        runner: &R,
        config: &DeployConfig,
        image: &ImageRef,
        diag: &mut Diagnostics,
    ) -> std::result::Result<DeployReport, DeployError> {
        let lock = if self.options.locking() {
            self.output.progress("deploy", "acquiring deploy lock");
            Some(
                DeployLock::acquire(runner, config.container_name(), self.options.force_lock)
                    .await?,
            )
        } else {
            None
        };

        let spec = ContainerSpec::from_config(config, image, self.settings.restart);
        let result = replace(runner, self.engine(), spec, diag).await;

        if let Some(lock) = lock
            && let Err(e) = lock.release().await
        {
            diag.warn(Warning::lock_release(e.to_string()));
        }

        result
    }

    /// Full pipeline: resolve, build, deploy.
    ///
    /// Builds always run through `build_runner` (the local engine); deploy
    /// commands run on whatever `connector` connects to.
    pub async fn run<B, C>(
        &self,
        params: &InvocationParams,
        env_file: &Path,
        build_runner: &B,
        connector: &C,
    ) -> Result<PipelineReport>
    where
        B: CommandRunner,
        C: TargetConnector,
    {
        let config = self.resolve(params, env_file)?;
        let build = self.build(&config, build_runner).await?;

        let mut diag = Diagnostics::default();
        let deploy = self.deploy(&config, &build.image, connector, &mut diag).await?;

        Ok(PipelineReport {
            config,
            build,
            deploy,
            warnings: diag.warnings().to_vec(),
        })
    }
}
