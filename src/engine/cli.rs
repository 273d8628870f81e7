// ABOUTME: Builds engine CLI invocations as structured command specs.
// ABOUTME: Covers build/push, buildx builder management, pull, ps, stop, rm and run.

use super::EngineKind;
use super::container::ContainerSpec;
use crate::config::{BuildSettings, DeployConfig};
use crate::exec::CommandSpec;
use crate::types::{ContainerName, ImageRef};

/// Command factory for one engine binary.
#[derive(Debug, Clone, Copy)]
pub struct EngineCli {
    kind: EngineKind,
}

/// A container found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingContainer {
    pub id: String,
    pub state: String,
}

impl ExistingContainer {
    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case("running")
    }
}

impl EngineCli {
    pub fn new(kind: EngineKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(self.kind.binary())
    }

    fn with_dockerfile(cmd: CommandSpec, build: &BuildSettings) -> CommandSpec {
        match &build.dockerfile {
            Some(dockerfile) => cmd.arg("-f").arg(dockerfile.display().to_string()),
            None => cmd,
        }
    }

    /// Single-platform build tagged with the registry reference.
    pub fn build(&self, image: &ImageRef, build: &BuildSettings) -> CommandSpec {
        let cmd = self.command().arg("build").arg("-t").arg(image.to_string());
        Self::with_dockerfile(cmd, build)
            .arg(build.path.display().to_string())
            .streaming()
    }

    pub fn push(&self, image: &ImageRef) -> CommandSpec {
        self.command().arg("push").arg(image.to_string()).streaming()
    }

    /// Exits zero when the builder exists.
    pub fn inspect_builder(&self, builder: &str) -> CommandSpec {
        self.command().args(["buildx", "inspect", builder])
    }

    pub fn create_builder(&self, builder: &str, context: &str) -> CommandSpec {
        self.command()
            .args(["buildx", "create", "--name", builder, context])
    }

    pub fn use_builder(&self, builder: &str) -> CommandSpec {
        self.command().args(["buildx", "use", builder])
    }

    /// Combined multi-platform build and push on the active builder.
    pub fn buildx_build_push(&self, image: &ImageRef, build: &BuildSettings) -> CommandSpec {
        let platforms = build
            .platforms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let cmd = self
            .command()
            .args(["buildx", "build", "--platform"])
            .arg(platforms)
            .arg("-t")
            .arg(image.to_string());
        Self::with_dockerfile(cmd, build)
            .arg("--push")
            .arg(build.path.display().to_string())
            .streaming()
    }

    pub fn pull(&self, image: &ImageRef) -> CommandSpec {
        self.command().arg("pull").arg(image.to_string())
    }

    /// Containers with exactly this name, running or stopped.
    /// Output lines are `<id> <state>`; see [`parse_container_list`].
    pub fn list(&self, name: &ContainerName) -> CommandSpec {
        self.command()
            .args(["ps", "-a", "--filter"])
            .arg(name.name_filter())
            .args(["--format", "{{.ID}} {{.State}}"])
    }

    pub fn stop(&self, name: &ContainerName) -> CommandSpec {
        self.command().arg("stop").arg(name.as_str())
    }

    pub fn remove(&self, name: &ContainerName) -> CommandSpec {
        self.command().args(["rm", "-f"]).arg(name.as_str())
    }

    /// Start the service container detached.
    ///
    /// Environment values whose key looks like a credential are redacted in
    /// the displayed form of the command.
    pub fn run(&self, spec: &ContainerSpec) -> CommandSpec {
        let mut cmd = self
            .command()
            .args(["run", "-d", "--name", spec.name.as_str()])
            .arg("-p")
            .arg(format!("{}:{}", spec.port, spec.port))
            .arg("--restart")
            .arg(spec.restart.to_string());

        for (key, value) in &spec.labels {
            cmd = cmd.arg("--label").arg(format!("{}={}", key, value));
        }

        for (key, value) in &spec.env {
            cmd = cmd.arg("-e");
            let pair = format!("{}={}", key, value);
            cmd = if DeployConfig::is_sensitive(key) {
                cmd.redacted_arg(pair, format!("{}=***", key))
            } else {
                cmd.arg(pair)
            };
        }

        cmd.arg(spec.image.to_string())
    }
}

/// Parse the output of [`EngineCli::list`].
pub fn parse_container_list(stdout: &str) -> Vec<ExistingContainer> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let id = fields.next()?;
            let state = fields.next().unwrap_or("unknown");
            Some(ExistingContainer {
                id: id.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}
