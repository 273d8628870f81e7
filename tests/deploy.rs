// ABOUTME: Integration tests for the replace transition on local and remote targets.
// ABOUTME: Drives the deploy stage against an in-memory engine and checks command order and outcomes.

mod support;

use simongpt_deploy::config::{DeployConfig, EnvFile, InvocationParams, RestartPolicy};
use simongpt_deploy::deploy::{DeployErrorKind, DeployLock, DeployStep, LockInfo, replace};
use simongpt_deploy::diagnostics::{Diagnostics, WarningKind};
use simongpt_deploy::engine::{ContainerSpec, EngineCli, EngineKind};
use simongpt_deploy::exec::Origin;
use simongpt_deploy::types::{ContainerName, ImageRef};
use support::FakeEngine;

const IMAGE: &str = "registry.simongpt.internal:5000/simongpt-llm-router";
const NAME: &str = "simongpt-llm-router";

fn config() -> DeployConfig {
    let file = EnvFile::parse("LLM_ROUTER_API_KEY=abc123\nJWT_SECRET_KEY=xyz789\nLOG_LEVEL=info\n");
    DeployConfig::from_sources(&InvocationParams::default(), Some(&file)).unwrap()
}

fn spec_for(image: &str) -> ContainerSpec {
    ContainerSpec::from_config(&config(), &ImageRef::parse(image).unwrap(), RestartPolicy::Always)
}

fn docker() -> EngineCli {
    EngineCli::new(EngineKind::Docker)
}

mod replace_transition {
    use super::*;

    #[tokio::test]
    async fn first_deploy_starts_without_cleanup() {
        support::init_tracing();
        let engine = FakeEngine::new(Origin::Local).with_image(IMAGE);
        let mut diag = Diagnostics::default();

        let report = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap();

        assert!(report.replaced.is_empty());
        assert_eq!(report.origin, Origin::Local);
        assert_eq!(engine.count("stop"), 0);
        assert_eq!(engine.count("rm -f"), 0);
        assert!(!diag.has_warnings());

        let state = engine.state();
        let container = &state.containers[NAME];
        assert!(container.running);
        assert_eq!(container.id, report.container_id);
        assert_eq!(container.port, "8080:8080");
        assert!(container.env.contains(&"LLM_ROUTER_API_KEY=abc123".to_string()));
        assert!(container.env.contains(&"JWT_SECRET_KEY=xyz789".to_string()));
        assert!(
            container
                .env
                .contains(&"OLLAMA_URL=http://host.docker.internal:11434".to_string())
        );
        assert!(container.env.contains(&"LOG_LEVEL=info".to_string()));
    }

    #[tokio::test]
    async fn pull_happens_before_anything_is_touched() {
        let engine = FakeEngine::new(Origin::Local).with_image(IMAGE);
        let mut diag = Diagnostics::default();

        replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap();

        let pull = engine.position("docker pull").unwrap();
        let query = engine.position("docker ps").unwrap();
        let run = engine.position("docker run").unwrap();
        assert!(pull < query && query < run);
    }

    #[tokio::test]
    async fn remote_replace_removes_before_start() {
        let engine = FakeEngine::new(Origin::Remote)
            .with_image(IMAGE)
            .with_container(NAME, "registry.simongpt.internal:5000/simongpt-llm-router", true);
        let old_id = engine.state().containers[NAME].id.clone();
        let mut diag = Diagnostics::default();

        let report = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap();

        let stop = engine.position("docker stop").unwrap();
        let remove = engine.position("docker rm -f").unwrap();
        let run = engine.position("docker run").unwrap();
        assert!(stop < remove && remove < run);

        assert!(
            engine
                .state()
                .log
                .iter()
                .all(|(origin, _)| *origin == Origin::Remote)
        );
        assert_eq!(report.origin, Origin::Remote);
        assert_eq!(report.replaced.len(), 1);
        assert_eq!(report.replaced[0].id, old_id);
        assert_ne!(report.container_id, old_id);
    }

    #[tokio::test]
    async fn stopped_container_is_removed_without_stop() {
        let engine = FakeEngine::new(Origin::Local)
            .with_image(IMAGE)
            .with_container(NAME, IMAGE, false);
        let mut diag = Diagnostics::default();

        replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap();

        assert_eq!(engine.count("docker stop"), 0);
        assert_eq!(engine.count("docker rm -f"), 1);
        assert!(engine.state().containers[NAME].running);
    }

    #[tokio::test]
    async fn repeated_deploys_leave_one_container_with_latest_image() {
        let v1 = format!("{IMAGE}:v1");
        let v2 = format!("{IMAGE}:v2");
        let engine = FakeEngine::new(Origin::Local)
            .with_image(&v1)
            .with_image(&v2);
        let mut diag = Diagnostics::default();

        replace(&engine, docker(), spec_for(&v1), &mut diag)
            .await
            .unwrap();
        replace(&engine, docker(), spec_for(&v2), &mut diag)
            .await
            .unwrap();
        let last = replace(&engine, docker(), spec_for(&v2), &mut diag)
            .await
            .unwrap();

        let state = engine.state();
        assert_eq!(state.containers.len(), 1);
        let container = &state.containers[NAME];
        assert_eq!(container.image, v2);
        assert_eq!(container.id, last.container_id);
        assert!(!diag.has_warnings());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn pull_failure_leaves_running_instance_untouched() {
        let engine = FakeEngine::new(Origin::Local)
            .with_container(NAME, IMAGE, true)
            .fail_on("docker pull", "registry unreachable");
        let mut diag = Diagnostics::default();

        let err = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::DeployFailed);
        assert_eq!(err.step(), Some(DeployStep::Pull));
        assert!(err.to_string().contains("registry unreachable"));
        assert_eq!(engine.count("docker stop"), 0);
        assert!(engine.state().containers[NAME].running);
    }

    #[tokio::test]
    async fn failed_removal_still_attempts_start() {
        let engine = FakeEngine::new(Origin::Remote)
            .with_image(IMAGE)
            .with_container(NAME, IMAGE, true)
            .fail_on("docker rm -f", "device or resource busy");
        let mut diag = Diagnostics::default();

        let err = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap_err();

        assert!(engine.position("docker run").is_some());
        assert_eq!(err.kind(), DeployErrorKind::RemoteExecutionFailed);
        assert_eq!(err.step(), Some(DeployStep::Start));
        let message = err.to_string();
        assert!(message.contains("already in use"), "{message}");
        assert!(message.contains("after failed cleanup"), "{message}");

        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::CleanupFailed);
    }

    #[tokio::test]
    async fn failed_stop_with_successful_removal_is_not_a_warning() {
        let engine = FakeEngine::new(Origin::Local)
            .with_image(IMAGE)
            .with_container(NAME, IMAGE, true)
            .fail_on("docker stop", "timeout");
        let mut diag = Diagnostics::default();

        replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap();

        assert!(!diag.has_warnings());
        assert!(engine.state().containers[NAME].running);
    }

    #[tokio::test]
    async fn start_failure_after_removal_leaves_target_empty() {
        let engine = FakeEngine::new(Origin::Local)
            .with_image(IMAGE)
            .with_container(NAME, IMAGE, true)
            .fail_on("docker run", "port is already allocated");
        let mut diag = Diagnostics::default();

        let err = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::DeployFailed);
        assert_eq!(err.step(), Some(DeployStep::Start));
        assert!(!err.to_string().contains("after failed cleanup"));
        assert!(engine.state().containers.is_empty());
    }

    #[tokio::test]
    async fn remote_transport_failure_is_remote_execution_failure() {
        let engine = FakeEngine::new(Origin::Remote).transport_down();
        let mut diag = Diagnostics::default();

        let err = replace(&engine, docker(), spec_for(IMAGE), &mut diag)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::RemoteExecutionFailed);
        assert_eq!(err.step(), Some(DeployStep::Pull));
        assert_eq!(engine.commands().len(), 1);
    }
}

mod lock {
    use super::*;
    use chrono::Utc;

    fn name() -> ContainerName {
        ContainerName::new(NAME).unwrap()
    }

    fn lock_json(started_at: chrono::DateTime<Utc>) -> String {
        let mut info = LockInfo::new(&name());
        info.holder = "ci-runner-7".to_string();
        info.pid = 4242;
        info.started_at = started_at;
        serde_json::to_string(&info).unwrap()
    }

    #[tokio::test]
    async fn acquire_and_release_on_free_target() {
        let engine = FakeEngine::new(Origin::Remote);

        let lock = DeployLock::acquire(&engine, &name(), false).await.unwrap();
        lock.release().await.unwrap();

        let commands = engine.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].starts_with("sh -c"));
        assert!(commands[0].contains("set -C"));
        assert!(commands[0].contains("simongpt-deploy/simongpt-llm-router.lock"));
        assert!(commands[1].contains("rm -f"));
    }

    #[tokio::test]
    async fn live_lock_is_reported_with_holder() {
        let engine = FakeEngine::new(Origin::Remote)
            .fail_on("set -C", "")
            .respond_to("cat ", &lock_json(Utc::now()));

        let err = DeployLock::acquire(&engine, &name(), false)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::LockHeld);
        let holder = err.lock_holder_info().unwrap();
        assert_eq!(holder.holder, "ci-runner-7");
        assert_eq!(holder.pid, 4242);
    }

    #[tokio::test]
    async fn stale_lock_is_broken_and_retried() {
        let engine = FakeEngine::new(Origin::Local)
            .fail_on("set -C", "")
            .respond_to("cat ", &lock_json(Utc::now() - chrono::Duration::hours(3)));

        let err = DeployLock::acquire(&engine, &name(), false)
            .await
            .unwrap_err();

        // The fake refuses every creation, so the retry after the break fails.
        assert_eq!(err.kind(), DeployErrorKind::LockError);
        assert_eq!(engine.count("set -C"), 2);
        assert!(engine.position("rm -f").is_some());
    }
}
