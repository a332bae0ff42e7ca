// ABOUTME: Clean command implementation.
// ABOUTME: Removes a project's containers and prunes its images on each endpoint.

use super::runtime_connection::connect_to_runtime;
use dockership::config::Config;
use dockership::deploy::Deployer;
use dockership::error::{Error, Result};
use dockership::output::Output;
use serde_json::json;
use std::sync::Arc;

pub async fn clean(config: &Config, project: &str, env: &str, mut output: Output) -> Result<()> {
    let environment = config.environment(env)?;
    let graph = config.graph()?;
    let project = graph
        .get(project)
        .ok_or_else(|| Error::UnknownProject(project.to_string()))?;

    output.start_timer();
    output.progress(&format!("Cleaning {} in {}", project.name, environment.name));

    for endpoint in environment.endpoints() {
        let runtime = connect_to_runtime(&endpoint, &output).await?;
        let deployer = Deployer::new(runtime)
            .with_environment(environment.name.as_str())
            .with_events(Arc::new(output.sink()));

        let report = deployer.clean(project).await?;
        output.record(
            &json!({
                "event": "cleaned",
                "project": project.name,
                "endpoint": endpoint.address,
                "removed_containers": report.removed_containers,
                "pruned_images": report.pruned_images,
            }),
            &format!(
                "  → {}: removed {} container(s), pruned {} image(s)",
                endpoint.address, report.removed_containers, report.pruned_images
            ),
        );
    }

    output.success(&format!("Cleaned {}", project.name));
    Ok(())
}
