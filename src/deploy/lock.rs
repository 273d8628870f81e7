// ABOUTME: Opt-in deploy lock preventing concurrent deployments of one container name.
// ABOUTME: Atomic file creation on the target with lock info stored in ~/.local/state/simongpt-deploy/.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exec::{CommandRunner, CommandSpec};
use crate::types::ContainerName;

use super::DeployError;

/// Base directory for lock files (XDG Base Directory compliant).
const STATE_DIR: &str = ".local/state/simongpt-deploy";

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    /// Container being deployed.
    pub container: String,
}

impl LockInfo {
    pub fn new(container: &ContainerName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            container: container.to_string(),
        }
    }

    /// Locks older than one hour are considered abandoned.
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }

    /// Path to the lock file, left for the target's shell to expand.
    pub fn lock_path(container: &ContainerName) -> String {
        format!("$HOME/{}/{}.lock", STATE_DIR, container)
    }
}

/// `sh -c <script> sh <args...>`; the script refers to its inputs as `$1`...
/// so no value is ever spliced into shell text.
fn shell(script: String, args: &[&str]) -> CommandSpec {
    CommandSpec::new("sh")
        .arg("-c")
        .arg(script)
        .arg("sh")
        .args(args.iter().copied())
}

/// A held deploy lock. Must be released with [`DeployLock::release`].
pub struct DeployLock<'a, R> {
    runner: &'a R,
    container: ContainerName,
}

impl<R> std::fmt::Debug for DeployLock<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployLock")
            .field("container", &self.container)
            .finish()
    }
}

impl<'a, R: CommandRunner> DeployLock<'a, R> {
    /// Acquire the deploy lock for `container` on the runner's target.
    ///
    /// Uses shell noclobber mode, so creation is atomic. Stale locks are broken
    /// with a warning; `force` breaks any lock.
    pub async fn acquire(
        runner: &'a R,
        container: &ContainerName,
        force: bool,
    ) -> Result<Self, DeployError> {
        let lock_path = LockInfo::lock_path(container);

        let lock_json = serde_json::to_string(&LockInfo::new(container))
            .map_err(|e| DeployError::lock_error(format!("failed to serialize lock: {}", e)))?;

        let acquire = shell(
            format!(
                "mkdir -p \"$HOME/{}\" && (set -C; printf '%s\\n' \"$1\" > \"{}\") 2>/dev/null",
                STATE_DIR, lock_path
            ),
            &[lock_json.as_str()],
        );

        if Self::try_create(runner, &acquire).await? {
            return Ok(Self::held(runner, container));
        }

        match Self::read_existing(runner, &lock_path).await? {
            Some(existing) if !force && !existing.is_stale() => {
                return Err(DeployError::lock_held(
                    existing.holder,
                    existing.pid,
                    existing.started_at,
                ));
            }
            Some(existing) if force => tracing::warn!(
                "breaking lock held by {} (pid {}) since {}",
                existing.holder,
                existing.pid,
                existing.started_at
            ),
            Some(existing) => tracing::warn!(
                "auto-breaking stale lock held by {} (pid {}) since {}",
                existing.holder,
                existing.pid,
                existing.started_at
            ),
            None => tracing::warn!("lock info unreadable, breaking lock"),
        }

        tracing::debug!("removing lock at {}", lock_path);
        let _ = runner
            .run(&shell(format!("rm -f \"{}\"", lock_path), &[]))
            .await;

        if Self::try_create(runner, &acquire).await? {
            Ok(Self::held(runner, container))
        } else {
            Err(DeployError::lock_error(
                "lock acquired by another process during break",
            ))
        }
    }

    fn held(runner: &'a R, container: &ContainerName) -> Self {
        Self {
            runner,
            container: container.clone(),
        }
    }

    async fn try_create(runner: &R, acquire: &CommandSpec) -> Result<bool, DeployError> {
        let output = runner
            .run(acquire)
            .await
            .map_err(|e| DeployError::lock_error(format!("failed to acquire lock: {}", e)))?;
        Ok(output.success())
    }

    /// `None` when the lock file cannot be read or parsed.
    async fn read_existing(runner: &R, lock_path: &str) -> Result<Option<LockInfo>, DeployError> {
        let output = runner
            .run(&shell(format!("cat \"{}\"", lock_path), &[]))
            .await
            .map_err(|e| DeployError::lock_error(format!("failed to read lock info: {}", e)))?;

        if !output.success() {
            return Ok(None);
        }
        Ok(serde_json::from_str(output.stdout.trim()).ok())
    }

    /// Remove the lock file.
    pub async fn release(self) -> Result<(), DeployError> {
        let lock_path = LockInfo::lock_path(&self.container);
        let output = self
            .runner
            .run(&shell(format!("rm -f \"{}\"", lock_path), &[]))
            .await
            .map_err(|e| DeployError::lock_error(format!("failed to release lock: {}", e)))?;

        if output.success() {
            Ok(())
        } else {
            Err(DeployError::lock_error(format!(
                "failed to release lock: {}",
                output.failure_detail()
            )))
        }
    }
}
