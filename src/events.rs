// ABOUTME: Structured deploy events and the sinks that receive them.
// ABOUTME: The orchestrator emits events; sinks log them or record them.

use parking_lot::Mutex;
use serde::Serialize;

use crate::deploy::DeployStep;
use crate::types::{ContainerId, ImageId, ProjectName};

/// Something the orchestrator did or is about to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent {
    StepStarted {
        project: ProjectName,
        step: DeployStep,
        endpoint: String,
    },
    StepFailed {
        project: ProjectName,
        step: DeployStep,
        endpoint: String,
        error: String,
    },
    RemovingImage {
        project: ProjectName,
        image: ImageId,
        name: String,
    },
    KillingContainer {
        project: ProjectName,
        container: ContainerId,
    },
    RemovingContainer {
        project: ProjectName,
        container: ContainerId,
    },
    BuildingImage {
        project: ProjectName,
        image: String,
        endpoint: String,
    },
    TaggingImage {
        project: ProjectName,
        image: String,
        tag: String,
    },
    CreatingContainer {
        project: ProjectName,
        image: String,
    },
    ContainerStarted {
        project: ProjectName,
        container: ContainerId,
        image: String,
        endpoint: String,
    },
    RestartingContainer {
        project: ProjectName,
        container: ContainerId,
        dependency: ProjectName,
    },
    RestartFailed {
        project: ProjectName,
        container: Option<ContainerId>,
        dependency: ProjectName,
        error: String,
    },
}

/// Receives deploy events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DeployEvent);
}

/// Forwards events to `tracing`.
///
/// Progress is logged at debug, a new or restarted container at info, and a
/// failed cascade restart at error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: DeployEvent) {
        match event {
            DeployEvent::StepStarted {
                project,
                step,
                endpoint,
            } => tracing::debug!(%project, %step, %endpoint, "step started"),
            DeployEvent::StepFailed {
                project,
                step,
                endpoint,
                error,
            } => tracing::debug!(%project, %step, %endpoint, %error, "step failed"),
            DeployEvent::RemovingImage {
                project,
                image,
                name,
            } => tracing::debug!(%project, image = image.short(), %name, "removing image"),
            DeployEvent::KillingContainer { project, container } => {
                tracing::debug!(%project, container = container.short(), "killing container")
            }
            DeployEvent::RemovingContainer { project, container } => {
                tracing::debug!(%project, container = container.short(), "removing container")
            }
            DeployEvent::BuildingImage {
                project,
                image,
                endpoint,
            } => tracing::debug!(%project, %image, %endpoint, "building image"),
            DeployEvent::TaggingImage {
                project,
                image,
                tag,
            } => tracing::debug!(%project, %image, %tag, "tagging image"),
            DeployEvent::CreatingContainer { project, image } => {
                tracing::debug!(%project, %image, "creating container")
            }
            DeployEvent::ContainerStarted {
                project,
                container,
                image,
                endpoint,
            } => tracing::info!(
                %project,
                container = container.short(),
                %image,
                %endpoint,
                "running new container"
            ),
            DeployEvent::RestartingContainer {
                project,
                container,
                dependency,
            } => tracing::info!(
                %project,
                container = container.short(),
                %dependency,
                "restarting linked container"
            ),
            DeployEvent::RestartFailed {
                project,
                container,
                dependency,
                error,
            } => tracing::error!(
                %project,
                container = container.as_ref().map(|c| c.short()).unwrap_or("-"),
                %dependency,
                %error,
                "unable to restart linked container"
            ),
        }
    }
}

/// Records events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DeployEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: DeployEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn project() -> ProjectName {
        ProjectName::new("web").unwrap()
    }

    #[test]
    fn memory_sink_keeps_emission_order() {
        let sink = MemorySink::new();
        sink.emit(DeployEvent::CreatingContainer {
            project: project(),
            image: "web:abc".to_string(),
        });
        sink.emit(DeployEvent::KillingContainer {
            project: project(),
            container: ContainerId::new("0123456789abcdef"),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DeployEvent::CreatingContainer { .. }));
        assert!(matches!(events[1], DeployEvent::KillingContainer { .. }));
    }

    #[test]
    fn sinks_are_usable_as_trait_objects() {
        let memory = Arc::new(MemorySink::new());
        let sinks: Vec<Arc<dyn EventSink>> = vec![memory.clone(), Arc::new(TracingSink)];
        for sink in &sinks {
            sink.emit(DeployEvent::StepStarted {
                project: project(),
                step: DeployStep::Build,
                endpoint: "unix:///var/run/docker.sock".to_string(),
            });
        }
        assert_eq!(memory.events().len(), 1);
        memory.clear();
        assert!(memory.events().is_empty());
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = DeployEvent::StepStarted {
            project: project(),
            step: DeployStep::CleanContainers,
            endpoint: "tcp://a:2376".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "step_started");
        assert_eq!(json["project"], "web");
        assert_eq!(json["step"], "clean_containers");
    }
}
