// ABOUTME: Config command implementation.
// ABOUTME: Prints the resolved configuration record with secrets masked.

use simongpt_deploy::config::{DeployConfig, InvocationParams, Settings};
use simongpt_deploy::error::Result;
use simongpt_deploy::orchestrator::{Orchestrator, RunOptions};
use simongpt_deploy::output::{Output, OutputMode};
use simongpt_deploy::types::ImageRef;
use std::path::Path;

pub fn show_config(
    params: &InvocationParams,
    env_file: &Path,
    settings: &Settings,
    output: &Output,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings, output, RunOptions::default());
    let config = orchestrator.resolve(params, env_file)?;
    let image = ImageRef::qualified(&settings.registry, config.image_name())
        .map_err(simongpt_deploy::config::ConfigError::from)?;

    let env: Vec<(String, String)> = config
        .env_vars()
        .iter()
        .map(|(key, value)| {
            let shown = if DeployConfig::is_sensitive(key) {
                "***"
            } else {
                value
            };
            (key.to_string(), shown.to_string())
        })
        .collect();

    if output.mode() == OutputMode::Json {
        let value = serde_json::json!({
            "image": image.to_string(),
            "container": config.container_name().as_str(),
            "port": config.port(),
            "service_url": config.service_url(),
            "build_context": config.build_context().to_string(),
            "target": config.target().to_string(),
            "engine": settings.engine.to_string(),
            "env": env
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect::<serde_json::Map<_, _>>(),
        });
        println!("{value}");
        return Ok(());
    }

    println!("image:         {}", image);
    println!("container:     {}", config.container_name());
    println!("port:          {}", config.port());
    println!("service url:   {}", config.service_url());
    println!("build context: {}", config.build_context());
    println!("target:        {}", config.target());
    println!("engine:        {}", settings.engine);
    println!("environment:");
    for (key, value) in env {
        println!("  {}={}", key, value);
    }
    Ok(())
}
