// ABOUTME: Deploy command implementation.
// ABOUTME: Runs resolve, build and replace, then reports warnings and the new container.

use super::dry_run_recorder;
use simongpt_deploy::config::{InvocationParams, Settings};
use simongpt_deploy::deploy::DeploymentTarget;
use simongpt_deploy::error::Result;
use simongpt_deploy::exec::LocalRunner;
use simongpt_deploy::orchestrator::{Orchestrator, PipelineReport, RunOptions};
use simongpt_deploy::output::Output;
use std::path::Path;

pub async fn deploy(
    params: &InvocationParams,
    env_file: &Path,
    settings: &Settings,
    options: RunOptions,
    dry_run: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let orchestrator = Orchestrator::new(settings, &output, options);

    let report = if dry_run {
        let recorder = dry_run_recorder(&output);
        orchestrator
            .run(params, env_file, &recorder, &recorder)
            .await?
    } else {
        let target = DeploymentTarget::new(settings.remote.clone());
        orchestrator
            .run(params, env_file, &LocalRunner::new(), &target)
            .await?
    };

    for warning in &report.warnings {
        output.warning(warning);
    }

    output.success(&summary(&report, dry_run));
    Ok(())
}

fn summary(report: &PipelineReport, dry_run: bool) -> String {
    let verb = if dry_run { "Would deploy" } else { "Deployed" };
    let id = match report.deploy.container_id.as_str() {
        "" => String::new(),
        id => format!(" ({})", id.chars().take(12).collect::<String>()),
    };
    let replaced = match report.deploy.replaced.len() {
        0 => "first deploy".to_string(),
        n => format!("replaced {} previous", n),
    };
    format!(
        "{} {}{} from {} on {} target, {}",
        verb,
        report.config.container_name(),
        id,
        report.deploy.image,
        report.deploy.origin,
        replaced
    )
}
