// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the subcommands, invocation parameters and global output flags.

use clap::{Args, Parser, Subcommand};
use simongpt_deploy::config::{
    BuildContext, DEFAULT_CONTAINER_NAME, DEFAULT_ENV_FILE, DEFAULT_IMAGE_NAME, DEFAULT_PORT,
    DEFAULT_SERVICE_URL, InvocationParams, Secret, TargetKind,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simongpt-deploy")]
#[command(about = "Build, push and replace the SimonGPT LLM router container")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result and problems
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Deployment settings file (default: discover deploy.yml)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a deploy.yml template in the current directory
    Init {
        /// Registry host to record
        #[arg(long)]
        registry: Option<String>,

        /// Remote deployment host as [user@]host[:port]
        #[arg(long)]
        remote: Option<String>,

        /// Overwrite an existing deploy.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Print the resolved configuration with secrets redacted
    Config {
        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        overrides: SettingsOverrides,
    },

    /// Build and push the image without deploying
    Build {
        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        overrides: SettingsOverrides,

        /// Print commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Build, push and replace the running container
    Deploy {
        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        overrides: SettingsOverrides,

        /// Print commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Hold a per-container lock on the target while deploying
        #[arg(long)]
        lock: bool,

        /// Break an existing deploy lock (implies --lock)
        #[arg(long)]
        force_lock: bool,
    },
}

/// Explicit invocation parameters.
#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Image name, qualified with the registry host when pushed
    #[arg(long = "image", default_value = DEFAULT_IMAGE_NAME)]
    pub image_name: String,

    /// Container name; the instance replaced on every deploy
    #[arg(long = "container", default_value = DEFAULT_CONTAINER_NAME)]
    pub container_name: String,

    /// API key (LLM_ROUTER_API_KEY); overrides the env file when non-empty
    #[arg(long)]
    pub api_key: Option<String>,

    /// Token signing secret (JWT_SECRET_KEY); overrides the env file when non-empty
    #[arg(long)]
    pub jwt_secret: Option<String>,

    /// Upstream model server URL (OLLAMA_URL); the env file wins while left at the default
    #[arg(long = "ollama-url", default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    /// Port published on both host and container
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// "default" for a local build, otherwise the context for a multi-platform builder
    #[arg(long, default_value = "default")]
    pub build_context: BuildContext,

    /// Where to run the container: local or remote
    #[arg(long, default_value = "local")]
    pub target: TargetKind,

    /// KEY=VALUE file read for secrets and extra environment
    #[arg(long, default_value = DEFAULT_ENV_FILE, value_name = "PATH")]
    pub env_file: PathBuf,
}

impl ParamArgs {
    pub fn invocation_params(&self) -> InvocationParams {
        InvocationParams {
            image_name: self.image_name.clone(),
            container_name: self.container_name.clone(),
            api_key: self.api_key.clone().map(Secret::new),
            jwt_secret: self.jwt_secret.clone().map(Secret::new),
            service_url: self.service_url.clone(),
            port: self.port,
            build_context: self.build_context.clone(),
            target: self.target,
        }
    }
}

/// Command-line overrides for deploy.yml values.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Registry host the image is pushed to and pulled from
    #[arg(long)]
    pub registry: Option<String>,

    /// Remote deployment host as [user@]host[:port]
    #[arg(long)]
    pub remote: Option<String>,
}
