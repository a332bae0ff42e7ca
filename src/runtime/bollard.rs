// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Talks to one Docker Engine endpoint over unix socket, HTTP, or TLS.

use crate::config::RestartPolicy as RestartPolicySpec;
use crate::models::{Container, ContainerState, DOCKERFILE_NAME, Image};
use crate::runtime::endpoint::Endpoint;
use crate::runtime::error::{
    ConnectionSnafu, MissingTlsMaterialSnafu, RuntimeError, UnreachableSnafu,
};
use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    BuildRequest, ContainerConfig, ContainerError, ContainerOps, ImageError, ImageOps,
    RuntimeInfo, RuntimeInfoError,
};
use crate::types::{ContainerId, ImageId, ImageName};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{
    ContainerCreateBody, ContainerSummary, HostConfig, ImageSummary, PortBinding, RestartPolicy,
    RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    BuildImageOptions, CreateContainerOptions, KillContainerOptions, ListContainersOptions,
    ListImagesOptions, RemoveContainerOptions, RemoveImageOptions, StartContainerOptions,
    TagImageOptionsBuilder,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use http_body_util::{Either, Full};
use snafu::ResultExt;
use std::collections::HashMap;
use std::io::Write;

const UNTAGGED: &str = "<none>:<none>";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn status_code(e: &bollard::errors::Error) -> Option<u16> {
    match e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. } => {
            Some(*status_code)
        }
        _ => None,
    }
}

fn map_image_error(e: bollard::errors::Error, image: &str) -> ImageError {
    match status_code(&e) {
        Some(404) => ImageError::NotFound(image.to_string()),
        Some(409) => ImageError::InUse(image.to_string()),
        _ => ImageError::Runtime(format!("{}: {}", image, e)),
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::ImageNotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::AlreadyExists(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_start_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 => ContainerError::AlreadyRunning(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_kill_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::NotRunning(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

// =============================================================================
// Listing Conversions
// =============================================================================

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Image named by its first usable tag. Untagged images are skipped.
fn image_from_summary(summary: ImageSummary, endpoint: &str) -> Option<Image> {
    let tags: Vec<ImageName> = summary
        .repo_tags
        .iter()
        .filter(|tag| tag.as_str() != UNTAGGED)
        .filter_map(|tag| ImageName::parse(tag).ok())
        .collect();
    let name = tags.first()?.clone();

    Some(Image {
        id: ImageId::new(summary.id),
        name,
        tags,
        created: timestamp(summary.created),
        endpoint: endpoint.to_string(),
    })
}

fn container_from_summary(summary: ContainerSummary, endpoint: &str) -> Option<Container> {
    let id = summary.id?;
    let name = summary
        .names
        .unwrap_or_default()
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();
    let image = summary
        .image
        .as_deref()
        .and_then(|image| ImageName::parse(image).ok())?;

    let state = match summary
        .state
        .map(|s| format!("{:?}", s).to_lowercase())
        .as_deref()
    {
        Some("running") => ContainerState::Running,
        _ => ContainerState::Stopped,
    };

    Some(Container {
        id: ContainerId::new(id),
        name,
        image,
        state,
        created: timestamp(summary.created.unwrap_or_default()),
        endpoint: endpoint.to_string(),
    })
}

fn restart_policy(policy: RestartPolicySpec) -> RestartPolicy {
    match policy {
        RestartPolicySpec::No => RestartPolicy {
            name: Some(RestartPolicyNameEnum::NO),
            maximum_retry_count: None,
        },
        RestartPolicySpec::Always => RestartPolicy {
            name: Some(RestartPolicyNameEnum::ALWAYS),
            maximum_retry_count: None,
        },
        RestartPolicySpec::OnFailure { max_retries } => RestartPolicy {
            name: Some(RestartPolicyNameEnum::ON_FAILURE),
            maximum_retry_count: Some(max_retries),
        },
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty_vec(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn host_config(config: &ContainerConfig) -> HostConfig {
    let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = config
        .host
        .port_bindings
        .iter()
        .map(|(guest, hosts)| {
            let bindings = hosts
                .iter()
                .map(|host| PortBinding {
                    host_ip: non_empty(&host.interface),
                    host_port: non_empty(&host.port),
                })
                .collect();
            (guest.clone(), Some(bindings))
        })
        .collect();

    HostConfig {
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        restart_policy: Some(restart_policy(config.host.restart_policy)),
        links: non_empty_vec(&config.host.links),
        volumes_from: non_empty_vec(&config.host.volumes_from),
        binds: non_empty_vec(&config.host.binds),
        ..Default::default()
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
pub struct BollardRuntime {
    client: Docker,
    endpoint: String,
}

impl BollardRuntime {
    pub fn new(client: Docker, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Build a client for the endpoint. No request is made until the first call.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, RuntimeError> {
        let timeout = endpoint.timeout.as_secs();
        let address = endpoint.address.as_str();

        let client = match &endpoint.tls {
            Some(tls) => {
                if let Some(path) = tls.missing() {
                    return MissingTlsMaterialSnafu {
                        endpoint: address,
                        path,
                    }
                    .fail();
                }
                Docker::connect_with_ssl(
                    address,
                    &tls.key,
                    &tls.cert,
                    &tls.ca,
                    timeout,
                    bollard::API_DEFAULT_VERSION,
                )
            }
            None if endpoint.is_unix_socket() => {
                Docker::connect_with_unix(address, timeout, bollard::API_DEFAULT_VERSION)
            }
            None => Docker::connect_with_http(address, timeout, bollard::API_DEFAULT_VERSION),
        }
        .context(ConnectionSnafu { endpoint: address })?;

        tracing::debug!(
            endpoint = address,
            tls = endpoint.tls.is_some(),
            "connected to runtime endpoint"
        );
        Ok(Self::new(client, address))
    }

    /// Connect and check that the endpoint answers.
    pub async fn open(endpoint: &Endpoint) -> Result<Self, RuntimeError> {
        let runtime = Self::connect(endpoint)?;
        runtime.ping().await.context(UnreachableSnafu {
            endpoint: endpoint.address.as_str(),
        })?;
        Ok(runtime)
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self) -> Result<Vec<Image>, ImageError> {
        let opts = ListImagesOptions {
            all: true,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        Ok(summaries
            .into_iter()
            .filter_map(|summary| image_from_summary(summary, &self.endpoint))
            .collect())
    }

    async fn build_image(
        &self,
        request: &BuildRequest,
        context: Vec<u8>,
        output: &mut (dyn Write + Send),
    ) -> Result<(), ImageError> {
        let image = request.image.to_string();
        let opts = BuildImageOptions {
            dockerfile: DOCKERFILE_NAME.to_string(),
            t: Some(image.clone()),
            nocache: request.no_cache,
            rm: request.no_cache,
            forcerm: request.no_cache,
            ..Default::default()
        };

        let body = Either::Left(Full::new(Bytes::from(context)));
        let mut stream = self.client.build_image(opts, None, Some(body));

        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| ImageError::BuildFailed(format!("{}: {}", image, e)))?;

            if let Some(detail) = info.error_detail {
                return Err(ImageError::BuildFailed(format!(
                    "{}: {}",
                    image,
                    detail.message.unwrap_or_default()
                )));
            }

            if let Some(text) = info.stream {
                output
                    .write_all(text.as_bytes())
                    .map_err(|e| ImageError::Output(e.to_string()))?;
            }
        }

        output
            .flush()
            .map_err(|e| ImageError::Output(e.to_string()))
    }

    async fn tag_image(
        &self,
        source: &ImageName,
        repository: &str,
        tag: &str,
        force: bool,
    ) -> Result<(), ImageError> {
        let target = format!("{}:{}", repository, tag);

        if !force {
            match self.client.inspect_image(&target).await {
                Ok(_) => return Err(ImageError::AlreadyExists(target)),
                Err(e) if status_code(&e) == Some(404) => {}
                Err(e) => return Err(map_image_error(e, &target)),
            }
        }

        let opts = TagImageOptionsBuilder::default()
            .repo(repository)
            .tag(tag)
            .build();

        let source = source.to_string();
        self.client
            .tag_image(&source, Some(opts))
            .await
            .map_err(|e| map_image_error(e, &source))
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(id.as_str(), Some(opts), None)
            .await
            .map_err(|e| map_image_error(e, id.as_str()))?;

        Ok(())
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn list_containers(&self) -> Result<Vec<Container>, ContainerError> {
        let opts = ListContainersOptions {
            all: true,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| ContainerError::Runtime(e.to_string()))?;

        Ok(summaries
            .into_iter()
            .filter_map(|summary| container_from_summary(summary, &self.endpoint))
            .collect())
    }

    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let exposed_ports = config.exposed_ports();

        let body = ContainerCreateBody {
            image: Some(config.image.to_string()),
            exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
            host_config: Some(host_config(config)),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(config.name.clone()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_create_error)?;

        Ok(ContainerId::new(response.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_start_error)
    }

    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .kill_container(id.as_str(), None::<KillContainerOptions>)
            .await
            .map_err(map_container_kill_error)
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .remove_container(id.as_str(), None::<RemoveContainerOptions>)
            .await
            .map_err(map_container_not_found_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostBinding;
    use bollard::models::ContainerSummaryStateEnum;

    fn image_summary(id: &str, tags: &[&str], created: i64) -> ImageSummary {
        ImageSummary {
            id: id.to_string(),
            repo_tags: tags.iter().map(|t| t.to_string()).collect(),
            created,
            ..Default::default()
        }
    }

    #[test]
    fn untagged_images_are_skipped() {
        let summary = image_summary("sha256:aaa", &["<none>:<none>"], 10);
        assert!(image_from_summary(summary, "unix:///var/run/docker.sock").is_none());
    }

    #[test]
    fn image_uses_first_real_tag() {
        let summary = image_summary("sha256:aaa", &["<none>:<none>", "web:abc123", "web:latest"], 10);
        let image = image_from_summary(summary, "tcp://a:2376").unwrap();
        assert_eq!(image.name, ImageName::new("web", "abc123"));
        assert_eq!(image.created.timestamp(), 10);
        assert_eq!(image.endpoint, "tcp://a:2376");
        assert_eq!(image.tags.len(), 2);
    }

    #[test]
    fn image_owned_through_any_tag() {
        let summary = image_summary("sha256:bbb", &["registry.local/web:r1", "web:r1"], 10);
        let image = image_from_summary(summary, "tcp://a:2376").unwrap();
        let web = crate::models::Project::new(crate::types::ProjectName::new("web").unwrap());

        assert_eq!(image.name.repository(), "registry.local/web");
        assert!(image.belongs_to(&web));
    }

    #[test]
    fn container_state_and_name_are_normalized() {
        let summary = ContainerSummary {
            id: Some("0123456789abcdef".to_string()),
            names: Some(vec!["/web".to_string()]),
            image: Some("web:abc123".to_string()),
            created: Some(42),
            state: Some(ContainerSummaryStateEnum::RUNNING),
            ..Default::default()
        };
        let container = container_from_summary(summary, "tcp://a:2376").unwrap();
        assert_eq!(container.name, "web");
        assert!(container.is_running());
        assert_eq!(container.created.timestamp(), 42);
    }

    #[test]
    fn exited_container_is_stopped() {
        let summary = ContainerSummary {
            id: Some("abc".to_string()),
            names: Some(vec!["/web".to_string()]),
            image: Some("web:old".to_string()),
            state: Some(ContainerSummaryStateEnum::EXITED),
            ..Default::default()
        };
        let container = container_from_summary(summary, "tcp://a:2376").unwrap();
        assert_eq!(container.state, ContainerState::Stopped);
    }

    #[test]
    fn host_config_carries_creation_settings() {
        let mut config = ContainerConfig {
            name: "web".to_string(),
            image: ImageName::new("web", "abc"),
            host: Default::default(),
        };
        config.host.port_bindings.insert(
            "80/tcp".to_string(),
            vec![HostBinding {
                interface: "0.0.0.0".to_string(),
                port: "8080".to_string(),
            }],
        );
        config.host.restart_policy = RestartPolicySpec::OnFailure { max_retries: 3 };
        config.host.links = vec!["db:db".to_string()];

        let host = host_config(&config);
        let bindings = host.port_bindings.unwrap();
        let binding = &bindings["80/tcp"].as_ref().unwrap()[0];
        assert_eq!(binding.host_ip.as_deref(), Some("0.0.0.0"));
        assert_eq!(binding.host_port.as_deref(), Some("8080"));

        let policy = host.restart_policy.unwrap();
        assert_eq!(policy.name, Some(RestartPolicyNameEnum::ON_FAILURE));
        assert_eq!(policy.maximum_retry_count, Some(3));
        assert_eq!(host.links, Some(vec!["db:db".to_string()]));
        assert_eq!(host.binds, None);
    }

    #[test]
    fn empty_host_port_is_left_to_the_runtime() {
        let mut config = ContainerConfig {
            name: "web".to_string(),
            image: ImageName::new("web", "abc"),
            host: Default::default(),
        };
        config.host.port_bindings.insert(
            "53/udp".to_string(),
            vec![HostBinding {
                interface: String::new(),
                port: String::new(),
            }],
        );
        let host = host_config(&config);
        let bindings = host.port_bindings.unwrap();
        let binding = &bindings["53/udp"].as_ref().unwrap()[0];
        assert_eq!(binding.host_ip, None);
        assert_eq!(binding.host_port, None);
        assert_eq!(config.exposed_ports(), vec!["53/udp".to_string()]);
    }
}
