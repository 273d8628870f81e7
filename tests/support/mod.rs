// ABOUTME: Test support utilities.
// ABOUTME: An in-memory container engine that answers engine CLI commands, plus tracing setup.

use async_trait::async_trait;
use parking_lot::Mutex;
use simongpt_deploy::config::{DeployConfig, TargetKind};
use simongpt_deploy::deploy::{DeployError, DeployStep, TargetConnector};
use simongpt_deploy::exec::{CommandOutput, CommandRunner, CommandSpec, ExecError, Origin};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("simongpt_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeContainer {
    pub id: String,
    pub image: String,
    pub running: bool,
    /// `-e` arguments, as passed.
    pub env: Vec<String>,
    pub port: String,
}

#[derive(Debug, Default)]
pub struct EngineState {
    pub containers: BTreeMap<String, FakeContainer>,
    pub builders: BTreeSet<String>,
    pub images: BTreeSet<String>,
    pub pushed: Vec<String>,
    /// Every command received, rendered without redaction, tagged with origin.
    pub log: Vec<(Origin, String)>,
    pub shutdowns: usize,
    failures: Vec<(String, String)>,
    responses: Vec<(String, String)>,
    transport_down: bool,
    shutdown_fails: bool,
    next_id: u32,
}

/// Answers docker-style CLI commands against in-memory state.
///
/// Clones share state, so one engine can play build host and deploy target.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct FakeEngine {
    origin: Origin,
    state: Arc<Mutex<EngineState>>,
}

#[allow(dead_code)]
impl FakeEngine {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    pub fn with_origin(&self, origin: Origin) -> Self {
        Self {
            origin,
            state: Arc::clone(&self.state),
        }
    }

    /// Seed an existing container.
    pub fn with_container(self, name: &str, image: &str, running: bool) -> Self {
        {
            let mut state = self.state.lock();
            state.next_id += 1;
            let id = format!("old{:04}", state.next_id);
            state.containers.insert(
                name.to_string(),
                FakeContainer {
                    id,
                    image: image.to_string(),
                    running,
                    env: Vec::new(),
                    port: String::new(),
                },
            );
        }
        self
    }

    /// Seed an image as already present in the registry.
    pub fn with_image(self, image: &str) -> Self {
        self.state.lock().pushed.push(image.to_string());
        self
    }

    /// Make every command whose rendered line contains `needle` exit 1 with `stderr`.
    pub fn fail_on(self, needle: &str, stderr: &str) -> Self {
        self.state
            .lock()
            .failures
            .push((needle.to_string(), stderr.to_string()));
        self
    }

    /// Answer commands containing `needle` with exit 0 and `stdout`.
    pub fn respond_to(self, needle: &str, stdout: &str) -> Self {
        self.state
            .lock()
            .responses
            .push((needle.to_string(), stdout.to_string()));
        self
    }

    /// Every command fails at the transport level.
    pub fn transport_down(self) -> Self {
        self.state.lock().transport_down = true;
        self
    }

    pub fn shutdown_fails(self) -> Self {
        self.state.lock().shutdown_fails = true;
        self
    }

    pub fn state(&self) -> parking_lot::MutexGuard<'_, EngineState> {
        self.state.lock()
    }

    /// Rendered commands, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().log.iter().map(|(_, c)| c.clone()).collect()
    }

    /// Index of the first command containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.commands().iter().filter(|c| c.contains(needle)).count()
    }

    fn ok(stdout: impl Into<String>) -> CommandOutput {
        CommandOutput {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn err(stderr: impl Into<String>) -> CommandOutput {
        CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn execute(state: &mut EngineState, args: &[&str]) -> CommandOutput {
        match args {
            ["build", "-t", image, ..] => {
                state.images.insert(image.to_string());
                Self::ok("")
            }
            ["push", image] => {
                if !state.images.contains(*image) {
                    return Self::err(format!("An image does not exist locally with the tag: {image}"));
                }
                state.pushed.push(image.to_string());
                Self::ok("")
            }
            ["buildx", "inspect", name] => {
                if state.builders.contains(*name) {
                    Self::ok(format!("Name: {name}"))
                } else {
                    Self::err(format!("ERROR: no builder \"{name}\" found"))
                }
            }
            ["buildx", "create", "--name", name, _context] => {
                if !state.builders.insert(name.to_string()) {
                    return Self::err(format!("ERROR: existing instance for \"{name}\""));
                }
                Self::ok(*name)
            }
            ["buildx", "use", name] => {
                if state.builders.contains(*name) {
                    Self::ok("")
                } else {
                    Self::err(format!("ERROR: run `docker buildx create --name {name}`"))
                }
            }
            ["buildx", "build", rest @ ..] => {
                let image = rest
                    .windows(2)
                    .find(|w| w[0] == "-t")
                    .map(|w| w[1].to_string())
                    .unwrap_or_default();
                state.images.insert(image.clone());
                state.pushed.push(image);
                Self::ok("")
            }
            ["pull", image] => {
                if state.pushed.iter().any(|p| p == image) || state.images.contains(*image) {
                    state.images.insert(image.to_string());
                    Self::ok("")
                } else {
                    Self::err(format!("manifest for {image} not found"))
                }
            }
            ["ps", "-a", "--filter", filter, "--format", _] => {
                let name = filter
                    .strip_prefix("name=^/?")
                    .and_then(|f| f.strip_suffix('$'))
                    .unwrap_or_default();
                let listing = state
                    .containers
                    .get(name)
                    .map(|c| {
                        let status = if c.running { "running" } else { "exited" };
                        format!("{} {}\n", c.id, status)
                    })
                    .unwrap_or_default();
                Self::ok(listing)
            }
            ["stop", name] => match state.containers.get_mut(*name) {
                Some(c) => {
                    c.running = false;
                    Self::ok(*name)
                }
                None => Self::err(format!("No such container: {name}")),
            },
            ["rm", "-f", name] => {
                state.containers.remove(*name);
                Self::ok(*name)
            }
            ["run", "-d", "--name", name, rest @ ..] => {
                if state.containers.contains_key(*name) {
                    return Self::err(format!(
                        "Conflict. The container name \"/{name}\" is already in use"
                    ));
                }
                let image = rest.last().copied().unwrap_or_default().to_string();
                if !state.images.contains(&image) {
                    return Self::err(format!("Unable to find image '{image}' locally"));
                }
                let env = rest
                    .windows(2)
                    .filter(|w| w[0] == "-e")
                    .map(|w| w[1].to_string())
                    .collect();
                let port = rest
                    .windows(2)
                    .find(|w| w[0] == "-p")
                    .map(|w| w[1].to_string())
                    .unwrap_or_default();
                state.next_id += 1;
                let id = format!("{:012x}", 0xc0ffee_u64 + u64::from(state.next_id));
                state.containers.insert(
                    name.to_string(),
                    FakeContainer {
                        id: id.clone(),
                        image,
                        running: true,
                        env,
                        port,
                    },
                );
                Self::ok(format!("{id}\n"))
            }
            // Lock scripts and anything else succeed without effect.
            _ => Self::ok(""),
        }
    }
}

#[async_trait]
impl CommandRunner for FakeEngine {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ExecError> {
        let mut state = self.state.lock();
        let rendered = command.render();
        state.log.push((self.origin, rendered.clone()));

        if state.transport_down {
            return Err(ExecError::Spawn {
                program: command.program().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionReset, "channel closed"),
            });
        }

        if let Some((_, stderr)) = state
            .failures
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
        {
            return Ok(Self::err(stderr.clone()));
        }

        if let Some((_, stdout)) = state
            .responses
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
        {
            return Ok(Self::ok(stdout.clone()));
        }

        let args: Vec<&str> = command.arg_values().collect();
        Ok(Self::execute(&mut state, &args))
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    async fn shutdown(&self) -> Result<(), ExecError> {
        let mut state = self.state.lock();
        state.shutdowns += 1;
        if state.shutdown_fails {
            return Err(ExecError::Spawn {
                program: "ssh".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TargetConnector for FakeEngine {
    type Runner = FakeEngine;

    async fn connect(&self, config: &DeployConfig) -> Result<FakeEngine, DeployError> {
        let origin = match config.target() {
            TargetKind::Local => Origin::Local,
            TargetKind::Remote => Origin::Remote,
        };
        Ok(self.with_origin(origin))
    }
}

/// A remote host that cannot be reached.
#[allow(dead_code)]
pub struct UnreachableHost;

#[async_trait]
impl TargetConnector for UnreachableHost {
    type Runner = FakeEngine;

    async fn connect(&self, config: &DeployConfig) -> Result<FakeEngine, DeployError> {
        Err(DeployError::step_failed(
            Origin::Remote,
            DeployStep::Connect,
            config.container_name().as_str(),
            "connection refused",
        ))
    }
}
