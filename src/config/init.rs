// ABOUTME: Scaffolding for a new deploy.yml settings file.
// ABOUTME: Writes the defaults out so operators can see and edit them.

use std::path::Path;

use crate::error::{Error, Result};

use super::{RemoteHost, SETTINGS_FILENAME, Settings};

/// Write a `deploy.yml` template into `dir`.
pub fn init_settings(
    dir: &Path,
    registry: Option<&str>,
    remote: Option<&str>,
    force: bool,
) -> Result<()> {
    let path = dir.join(SETTINGS_FILENAME);

    if path.exists() && !force {
        return Err(Error::AlreadyExists(path));
    }

    let mut settings = Settings::default();

    if let Some(registry) = registry {
        settings.registry = registry.to_string();
    }

    if let Some(remote) = remote {
        settings.remote = RemoteHost::parse(remote).map_err(Error::InvalidSettings)?;
    }

    std::fs::write(&path, template_yaml(&settings))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

fn template_yaml(settings: &Settings) -> String {
    let remote = &settings.remote;
    format!(
        r#"# Registry the image is pushed to and pulled from.
registry: {registry}

# Container engine CLI: docker or podman.
engine: {engine}

# Host used with --target remote.
remote:
  host: {host}
  port: {port}
  user: {user}
  # key_path: ~/.ssh/id_ed25519
  # SSH host key verification (default: false)
  # Set to true to enable Trust-On-First-Use, or pre-populate ~/.ssh/known_hosts
  # trust_first_connection: true

build:
  path: {path}
  # dockerfile: Dockerfile
  # Platforms used when --build-context names a builder context.
  platforms:
    - {platform}

restart: {restart}
"#,
        registry = settings.registry,
        engine = settings.engine,
        host = remote.host,
        port = remote.port,
        user = remote.user,
        path = settings.build.path.display(),
        platform = settings.build.platforms.first(),
        restart = settings.restart,
    )
}
