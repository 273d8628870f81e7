// ABOUTME: Build command implementation.
// ABOUTME: Resolves the configuration and builds/pushes the image without deploying.

use super::dry_run_recorder;
use simongpt_deploy::config::{InvocationParams, Settings};
use simongpt_deploy::error::Result;
use simongpt_deploy::exec::LocalRunner;
use simongpt_deploy::orchestrator::{Orchestrator, RunOptions};
use simongpt_deploy::output::Output;
use std::path::Path;

pub async fn build(
    params: &InvocationParams,
    env_file: &Path,
    settings: &Settings,
    dry_run: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let orchestrator = Orchestrator::new(settings, &output, RunOptions::default());

    let config = orchestrator.resolve(params, env_file)?;
    let outcome = if dry_run {
        orchestrator
            .build(&config, &dry_run_recorder(&output))
            .await?
    } else {
        orchestrator.build(&config, &LocalRunner::new()).await?
    };

    output.success(&format!("Image {} pushed", outcome.image));
    Ok(())
}
