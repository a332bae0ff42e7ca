// ABOUTME: Status command implementation.
// ABOUTME: Lists each project's images and containers per endpoint, oldest first.

use super::runtime_connection::connect_to_runtime;
use dockership::config::Config;
use dockership::deploy::{Deployer, RuntimeFailure};
use dockership::error::{Error, Result};
use dockership::models::Project;
use dockership::output::Output;
use serde_json::json;

pub async fn status(
    config: &Config,
    project: Option<&str>,
    env: &str,
    output: Output,
) -> Result<()> {
    let environment = config.environment(env)?;
    let graph = config.graph()?;

    let projects: Vec<&Project> = match project {
        Some(name) => vec![
            graph
                .get(name)
                .ok_or_else(|| Error::UnknownProject(name.to_string()))?,
        ],
        None => graph.projects().collect(),
    };

    for endpoint in environment.endpoints() {
        let runtime = connect_to_runtime(&endpoint, &output).await?;
        let deployer = Deployer::new(runtime).with_environment(environment.name.as_str());

        for project in &projects {
            let images = deployer
                .list_images(project)
                .await
                .map_err(|e| status_error(&endpoint.address, e.into()))?;
            let containers = deployer
                .list_containers(project)
                .await
                .map_err(|e| status_error(&endpoint.address, e.into()))?;

            for image in &images {
                output.record(
                    &json!({
                        "event": "image",
                        "project": project.name,
                        "endpoint": image.endpoint,
                        "id": image.id.short(),
                        "name": image.name.to_string(),
                        "created": image.created,
                    }),
                    &format!(
                        "{}  image      {}  {}  {}",
                        project.name,
                        image.id.short(),
                        image.name,
                        image.created.format("%Y-%m-%d %H:%M:%S")
                    ),
                );
            }

            for container in &containers {
                let state = if container.is_running() {
                    "running"
                } else {
                    "stopped"
                };
                output.record(
                    &json!({
                        "event": "container",
                        "project": project.name,
                        "endpoint": container.endpoint,
                        "id": container.id.short(),
                        "name": container.name,
                        "image": container.image.to_string(),
                        "state": state,
                        "created": container.created,
                    }),
                    &format!(
                        "{}  container  {}  {}  {}  {}",
                        project.name,
                        container.id.short(),
                        container.name,
                        container.image,
                        state
                    ),
                );
            }
        }
    }

    Ok(())
}

fn status_error(endpoint: &str, source: RuntimeFailure) -> Error {
    Error::Listing {
        endpoint: endpoint.to_string(),
        source,
    }
}
