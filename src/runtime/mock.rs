// ABOUTME: In-memory runtime used by orchestrator tests.
// ABOUTME: Records every call and fails on demand.

use crate::models::{Container, ContainerState, Image};
use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    BuildRequest, ContainerConfig, ContainerError, ContainerOps, ImageError, ImageOps,
    RuntimeInfo, RuntimeInfoError,
};
use crate::types::{ContainerId, ImageId, ImageName};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::io::Write;

/// One runtime call, as observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListImages,
    Build(String),
    Tag { source: String, target: String },
    RemoveImage(String),
    ListContainers,
    Create(String),
    Start(String),
    Kill(String),
    RemoveContainer(String),
}

#[derive(Debug, Clone)]
struct StoredImage {
    id: ImageId,
    tags: Vec<ImageName>,
    created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatedContainer {
    pub id: ContainerId,
    pub config: ContainerConfig,
}

#[derive(Debug, Default)]
struct State {
    images: Vec<StoredImage>,
    containers: Vec<Container>,
    created: Vec<CreatedContainer>,
    calls: Vec<Call>,
    failures: Vec<Call>,
    fail_listing: bool,
    clock: i64,
    next_id: u64,
}

impl State {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(self.clock, 0).single().unwrap_or_default()
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{:012x}", prefix, self.next_id)
    }

    fn record(&mut self, call: Call) -> bool {
        let fail = self.failures.contains(&call);
        self.calls.push(call);
        fail
    }

    fn untag(&mut self, name: &ImageName) {
        for image in &mut self.images {
            image.tags.retain(|t| t != name);
        }
    }
}

pub struct MockRuntime {
    endpoint: String,
    state: Mutex<State>,
}

impl MockRuntime {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            state: Mutex::new(State {
                clock: 1_000,
                ..Default::default()
            }),
        }
    }

    /// Seed an image tagged `name`, created at `created` seconds.
    pub fn with_image(self, name: &str, created: i64) -> Self {
        {
            let mut state = self.state.lock();
            let id = ImageId::new(state.fresh_id("sha256:"));
            let name = ImageName::parse(name).unwrap();
            state.untag(&name);
            state.images.push(StoredImage {
                id,
                tags: vec![name],
                created: Utc.timestamp_opt(created, 0).unwrap(),
            });
        }
        self
    }

    pub fn with_container(self, name: &str, image: &str, running: bool, created: i64) -> Self {
        {
            let mut state = self.state.lock();
            let id = ContainerId::new(state.fresh_id(""));
            state.containers.push(Container {
                id,
                name: name.to_string(),
                image: ImageName::parse(image).unwrap(),
                state: if running {
                    ContainerState::Running
                } else {
                    ContainerState::Stopped
                },
                created: Utc.timestamp_opt(created, 0).unwrap(),
                endpoint: self.endpoint.clone(),
            });
        }
        self
    }

    /// Make every matching call fail.
    pub fn fail_on(self, call: Call) -> Self {
        self.state.lock().failures.push(call);
        self
    }

    pub fn fail_listing(self) -> Self {
        self.state.lock().fail_listing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn images(&self) -> Vec<Image> {
        let state = self.state.lock();
        state
            .images
            .iter()
            .filter_map(|image| {
                image.tags.first().map(|name| Image {
                    id: image.id.clone(),
                    name: name.clone(),
                    tags: image.tags.clone(),
                    created: image.created,
                    endpoint: self.endpoint.clone(),
                })
            })
            .collect()
    }

    pub fn tags(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut tags: Vec<String> = state
            .images
            .iter()
            .flat_map(|image| image.tags.iter().map(ToString::to_string))
            .collect();
        tags.sort();
        tags
    }

    pub fn containers(&self) -> Vec<Container> {
        self.state.lock().containers.clone()
    }

    pub fn created(&self) -> Vec<CreatedContainer> {
        self.state.lock().created.clone()
    }

    pub fn container_id(&self, name: &str) -> ContainerId {
        self.state
            .lock()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
            .unwrap()
    }
}

impl Sealed for MockRuntime {}

#[async_trait]
impl RuntimeInfo for MockRuntime {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        Ok(())
    }
}

#[async_trait]
impl ImageOps for MockRuntime {
    async fn list_images(&self) -> Result<Vec<Image>, ImageError> {
        if self.state.lock().record(Call::ListImages) {
            return Err(ImageError::Runtime("listing refused".to_string()));
        }
        Ok(self.images())
    }

    async fn build_image(
        &self,
        request: &BuildRequest,
        context: Vec<u8>,
        output: &mut (dyn Write + Send),
    ) -> Result<(), ImageError> {
        let mut state = self.state.lock();
        if state.record(Call::Build(request.image.to_string())) {
            return Err(ImageError::BuildFailed(request.image.to_string()));
        }

        writeln!(output, "received {} bytes of build context", context.len())
            .map_err(|e| ImageError::Output(e.to_string()))?;

        let id = ImageId::new(state.fresh_id("sha256:"));
        let created = state.tick();
        state.untag(&request.image);
        state.images.push(StoredImage {
            id: id.clone(),
            tags: vec![request.image.clone()],
            created,
        });

        writeln!(output, "Successfully built {}", id.short())
            .map_err(|e| ImageError::Output(e.to_string()))
    }

    async fn tag_image(
        &self,
        source: &ImageName,
        repository: &str,
        tag: &str,
        force: bool,
    ) -> Result<(), ImageError> {
        let target = ImageName::new(repository, tag);
        let mut state = self.state.lock();
        if state.record(Call::Tag {
            source: source.to_string(),
            target: target.to_string(),
        }) {
            return Err(ImageError::Runtime(format!("cannot tag {}", target)));
        }

        let Some(index) = state.images.iter().position(|i| i.tags.contains(source)) else {
            return Err(ImageError::NotFound(source.to_string()));
        };
        if state.images[index].tags.contains(&target) {
            return Ok(());
        }
        if !force && state.images.iter().any(|i| i.tags.contains(&target)) {
            return Err(ImageError::AlreadyExists(target.to_string()));
        }

        state.untag(&target);
        state.images[index].tags.push(target);
        Ok(())
    }

    async fn remove_image(&self, id: &ImageId, _force: bool) -> Result<(), ImageError> {
        let mut state = self.state.lock();
        if state.record(Call::RemoveImage(id.to_string())) {
            return Err(ImageError::InUse(id.to_string()));
        }
        let before = state.images.len();
        state.images.retain(|i| &i.id != id);
        if state.images.len() == before {
            return Err(ImageError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for MockRuntime {
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError> {
        let mut state = self.state.lock();
        if state.record(Call::ListContainers) || state.fail_listing {
            return Err(ContainerError::Runtime("listing refused".to_string()));
        }
        Ok(state.containers.clone())
    }

    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut state = self.state.lock();
        if state.record(Call::Create(config.name.clone())) {
            return Err(ContainerError::Runtime(format!("cannot create {}", config.name)));
        }
        if state.containers.iter().any(|c| c.name == config.name) {
            return Err(ContainerError::AlreadyExists(config.name.clone()));
        }
        if !state.images.iter().any(|i| i.tags.contains(&config.image)) {
            return Err(ContainerError::ImageNotFound(config.image.to_string()));
        }

        let id = ContainerId::new(state.fresh_id(""));
        let created = state.tick();
        state.containers.push(Container {
            id: id.clone(),
            name: config.name.clone(),
            image: config.image.clone(),
            state: ContainerState::Stopped,
            created,
            endpoint: self.endpoint.clone(),
        });
        state.created.push(CreatedContainer {
            id: id.clone(),
            config: config.clone(),
        });
        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        if state.record(Call::Start(id.to_string())) {
            return Err(ContainerError::Runtime(format!("cannot start {}", id)));
        }
        let container = state
            .containers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if container.is_running() {
            return Err(ContainerError::AlreadyRunning(id.to_string()));
        }
        container.state = ContainerState::Running;
        Ok(())
    }

    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        if state.record(Call::Kill(id.to_string())) {
            return Err(ContainerError::Runtime(format!("cannot kill {}", id)));
        }
        let container = state
            .containers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if !container.is_running() {
            return Err(ContainerError::NotRunning(id.to_string()));
        }
        container.state = ContainerState::Stopped;
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        if state.record(Call::RemoveContainer(id.to_string())) {
            return Err(ContainerError::Runtime(format!("cannot remove {}", id)));
        }
        let Some(index) = state.containers.iter().position(|c| &c.id == id) else {
            return Err(ContainerError::NotFound(id.to_string()));
        };
        if state.containers[index].is_running() {
            return Err(ContainerError::Runtime(format!("{} is running", id)));
        }
        state.containers.remove(index);
        Ok(())
    }
}
