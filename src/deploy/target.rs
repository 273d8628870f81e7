// ABOUTME: Deployment targets: the local engine or an engine reached over SSH.
// ABOUTME: Connects the runner for the selected target and drives the replace transition.

use async_trait::async_trait;

use crate::config::{DeployConfig, RemoteHost, TargetKind};
use crate::diagnostics::Diagnostics;
use crate::engine::{ContainerSpec, EngineCli, ExistingContainer};
use crate::exec::{
    CommandOutput, CommandRunner, CommandSpec, DryRunRunner, ExecError, LocalRunner, Origin,
    RemoteRunner,
};
use crate::ssh::Session;
use crate::types::ImageRef;

use super::Deployment;
use super::error::{DeployError, DeployStep};

/// Outcome of a successful replace.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub container_id: String,
    pub image: ImageRef,
    /// Prior instances removed to make room. Empty on a first deployment.
    pub replaced: Vec<ExistingContainer>,
    pub origin: Origin,
}

/// Replace whatever runs under `spec.name` with a fresh container from `spec.image`.
///
/// Pull, query, stop/remove (best effort), start. No retries, no rollback:
/// if the start fails after removal the target is left without an instance.
pub async fn replace<R: CommandRunner>(
    runner: &R,
    engine: EngineCli,
    spec: ContainerSpec,
    diag: &mut Diagnostics,
) -> Result<DeployReport, DeployError> {
    tracing::info!(
        "replacing {} with {} ({})",
        spec.name,
        spec.image,
        runner.origin()
    );

    let started = Deployment::new(spec, engine)
        .pull_image(runner)
        .await?
        .inspect(runner)
        .await?
        .clear(runner, diag)
        .await
        .start(runner)
        .await?;

    Ok(DeployReport {
        container_id: started.container_id().to_string(),
        image: started.image().clone(),
        replaced: started.replaced().to_vec(),
        origin: runner.origin(),
    })
}

/// Produces the command runner for the configured deployment target.
#[async_trait]
pub trait TargetConnector: Send + Sync {
    type Runner: CommandRunner;

    async fn connect(&self, config: &DeployConfig) -> Result<Self::Runner, DeployError>;
}

/// Runner for either target variant.
#[derive(Debug)]
pub enum TargetRunner {
    Local(LocalRunner),
    Remote(RemoteRunner),
}

#[async_trait]
impl CommandRunner for TargetRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        match self {
            TargetRunner::Local(runner) => runner.run(command).await,
            TargetRunner::Remote(runner) => runner.run(command).await,
        }
    }

    fn origin(&self) -> Origin {
        match self {
            TargetRunner::Local(runner) => runner.origin(),
            TargetRunner::Remote(runner) => runner.origin(),
        }
    }

    async fn shutdown(&self) -> Result<(), ExecError> {
        match self {
            TargetRunner::Local(runner) => runner.shutdown().await,
            TargetRunner::Remote(runner) => runner.shutdown().await,
        }
    }
}

/// Connects to the real targets: the local engine, or `remote` over SSH.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    remote: RemoteHost,
}

impl DeploymentTarget {
    pub fn new(remote: RemoteHost) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &RemoteHost {
        &self.remote
    }
}

#[async_trait]
impl TargetConnector for DeploymentTarget {
    type Runner = TargetRunner;

    async fn connect(&self, config: &DeployConfig) -> Result<TargetRunner, DeployError> {
        match config.target() {
            TargetKind::Local => Ok(TargetRunner::Local(LocalRunner::new())),
            TargetKind::Remote => {
                let session_config = self.remote.session_config();
                tracing::info!("connecting to {}", session_config.destination());
                let session = Session::connect(session_config).await.map_err(|e| {
                    DeployError::step_failed(
                        Origin::Remote,
                        DeployStep::Connect,
                        config.container_name().as_str(),
                        e.to_string(),
                    )
                })?;
                Ok(TargetRunner::Remote(RemoteRunner::new(session)))
            }
        }
    }
}

/// Dry runs record deploy commands under the origin of the selected target.
#[async_trait]
impl TargetConnector for DryRunRunner {
    type Runner = DryRunRunner;

    async fn connect(&self, config: &DeployConfig) -> Result<DryRunRunner, DeployError> {
        let origin = match config.target() {
            TargetKind::Local => Origin::Local,
            TargetKind::Remote => Origin::Remote,
        };
        Ok(self.with_origin(origin))
    }
}
