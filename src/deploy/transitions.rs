// ABOUTME: State transition methods for the replace deployment.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::diagnostics::{Diagnostics, Warning};
use crate::engine::parse_container_list;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};

use super::Deployment;
use super::error::{DeployError, DeployStep};
use super::state::{Cleared, ImagePulled, Inspected, Planned, Started};

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            spec: self.spec,
            engine: self.engine,
            state,
        }
    }

    /// Run one step; non-zero exits and transport errors both fail it.
    async fn run_step<R: CommandRunner>(
        &self,
        runner: &R,
        step: DeployStep,
        command: &CommandSpec,
    ) -> Result<CommandOutput, DeployError> {
        let fail = |detail: String| {
            DeployError::step_failed(runner.origin(), step, self.spec.name.as_str(), detail)
        };

        let output = runner
            .run(command)
            .await
            .map_err(|e| fail(e.to_string()))?;

        if output.success() {
            Ok(output)
        } else {
            Err(fail(output.failure_detail()))
        }
    }
}

impl Deployment<Planned> {
    /// Pull the image onto the target before touching the running instance.
    ///
    /// # Errors
    ///
    /// `DeployFailed`/`RemoteExecutionFailed` with step `Pull`; the previous
    /// instance is left running.
    #[must_use = "deployment state must be used"]
    pub async fn pull_image<R: CommandRunner>(
        self,
        runner: &R,
    ) -> Result<Deployment<ImagePulled>, DeployError> {
        let command = self.engine.pull(&self.spec.image);
        self.run_step(runner, DeployStep::Pull, &command).await?;
        Ok(self.transition(ImagePulled))
    }
}

impl Deployment<ImagePulled> {
    /// Find containers, running or stopped, that carry the container name.
    #[must_use = "deployment state must be used"]
    pub async fn inspect<R: CommandRunner>(
        self,
        runner: &R,
    ) -> Result<Deployment<Inspected>, DeployError> {
        let command = self.engine.list(&self.spec.name);
        let output = self.run_step(runner, DeployStep::Query, &command).await?;
        let existing = parse_container_list(&output.stdout);

        match existing.as_slice() {
            [] => tracing::info!("no existing container {} (first deploy)", self.spec.name),
            found => tracing::info!(
                "found {} existing container(s) named {}",
                found.len(),
                self.spec.name
            ),
        }

        Ok(self.transition(Inspected { existing }))
    }
}

impl Deployment<Inspected> {
    /// Stop and remove the previous instance.
    ///
    /// Best effort: failures are recorded as `CleanupFailed` warnings and the
    /// deployment moves on, since the start step reports any name clash.
    #[must_use = "deployment state must be used"]
    pub async fn clear<R: CommandRunner>(
        self,
        runner: &R,
        diag: &mut Diagnostics,
    ) -> Deployment<Cleared> {
        if self.state.existing.is_empty() {
            return self.transition(Cleared {
                replaced: Vec::new(),
                cleanup_failure: None,
            });
        }

        let mut failures = Vec::new();

        if self.state.existing.iter().any(|c| c.is_running()) {
            let stop = self.engine.stop(&self.spec.name);
            if let Err(e) = self.run_step(runner, DeployStep::Stop, &stop).await {
                failures.push(e.to_string());
            }
        }

        let remove = self.engine.remove(&self.spec.name);
        let removed = self.run_step(runner, DeployStep::Remove, &remove).await;
        if let Err(e) = &removed {
            failures.push(e.to_string());
        }

        // A failed stop followed by a forced removal still leaves the name free.
        let cleanup_failure = match removed {
            Ok(_) => None,
            Err(_) => Some(failures.join("; ")),
        };

        if let Some(ref detail) = cleanup_failure {
            diag.warn(Warning::cleanup_failed(
                DeployError::CleanupFailed {
                    container: self.spec.name.to_string(),
                    detail: detail.clone(),
                }
                .to_string(),
            ));
        } else if !failures.is_empty() {
            tracing::debug!("stop failed but removal succeeded: {}", failures.join("; "));
        }

        let replaced = self.state.existing.clone();
        self.transition(Cleared {
            replaced,
            cleanup_failure,
        })
    }
}

impl Deployment<Cleared> {
    /// Start the new container.
    ///
    /// # Errors
    ///
    /// `DeployFailed`/`RemoteExecutionFailed` with step `Start`. When cleanup
    /// had failed too, its reason is appended to the error detail. The target
    /// is left without an instance; nothing is rolled back.
    #[must_use = "deployment state must be used"]
    pub async fn start<R: CommandRunner>(
        self,
        runner: &R,
    ) -> Result<Deployment<Started>, DeployError> {
        let command = self.engine.run(&self.spec);
        let output = match self.run_step(runner, DeployStep::Start, &command).await {
            Ok(output) => output,
            Err(e) => {
                return Err(match (&self.state.cleanup_failure, e) {
                    (
                        Some(cleanup),
                        DeployError::DeployFailed {
                            step,
                            container,
                            detail,
                        },
                    ) => DeployError::DeployFailed {
                        step,
                        container,
                        detail: format!("{} (after failed cleanup: {})", detail, cleanup),
                    },
                    (
                        Some(cleanup),
                        DeployError::RemoteExecutionFailed {
                            step,
                            container,
                            detail,
                        },
                    ) => DeployError::RemoteExecutionFailed {
                        step,
                        container,
                        detail: format!("{} (after failed cleanup: {})", detail, cleanup),
                    },
                    (_, e) => e,
                });
            }
        };

        let container_id = output
            .stdout
            .lines()
            .last()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let replaced = self.state.replaced.clone();
        Ok(self.transition(Started {
            container_id,
            replaced,
        }))
    }
}
