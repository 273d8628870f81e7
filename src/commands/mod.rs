// ABOUTME: Command handlers for the simongpt-deploy CLI.
// ABOUTME: Shared settings loading plus one module per subcommand.

mod build;
mod config;
mod deploy;

pub use build::build;
pub use config::show_config;
pub use deploy::deploy;

use crate::cli::SettingsOverrides;
use simongpt_deploy::config::{RemoteHost, Settings};
use simongpt_deploy::error::{Error, Result};
use simongpt_deploy::exec::{DryRunRunner, Origin};
use simongpt_deploy::output::{Output, OutputMode};
use std::env;
use std::path::Path;

/// Load deploy.yml (explicit path or discovered) and apply command-line overrides.
pub fn load_settings(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(&env::current_dir()?)?,
    };

    if let Some(ref registry) = overrides.registry {
        if registry.trim().is_empty() {
            return Err(Error::InvalidSettings(
                "registry cannot be empty".to_string(),
            ));
        }
        settings.registry = registry.trim().to_string();
    }

    if let Some(ref remote) = overrides.remote {
        let address = RemoteHost::parse(remote).map_err(Error::InvalidSettings)?;
        // Keep key and host-key settings from the file; only the address changes.
        settings.remote = RemoteHost {
            host: address.host,
            port: address.port,
            user: address.user,
            ..settings.remote
        };
    }

    Ok(settings)
}

/// Recorder used for `--dry-run`; prints commands unless output is machine-readable.
fn dry_run_recorder(output: &Output) -> DryRunRunner {
    DryRunRunner::new(Origin::Local).echo(output.mode() != OutputMode::Json)
}
