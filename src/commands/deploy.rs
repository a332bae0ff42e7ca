// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the deploy pipeline on every endpoint of an environment.

use super::runtime_connection::connect_to_runtime;
use dockership::config::Config;
use dockership::deploy::Deployer;
use dockership::error::{Error, Result};
use dockership::output::{Output, OutputMode};
use dockership::types::Revision;
use serde_json::json;
use std::io::{self, Write};
use std::sync::Arc;

/// Deploy a revision of a project to every endpoint of an environment.
///
/// Endpoints are handled in configured order; the first failure stops the
/// command and later endpoints are left untouched.
pub async fn deploy(
    config: &Config,
    project: &str,
    env: &str,
    revision: &Revision,
    mut output: Output,
) -> Result<()> {
    let environment = config.environment(env)?;
    let graph = config.graph()?;
    let project = graph
        .get(project)
        .ok_or_else(|| Error::UnknownProject(project.to_string()))?;
    let dockerfile = config.dockerfile(project.name.as_str())?;

    output.start_timer();
    output.progress(&format!(
        "Deploying {} ({}) to {} endpoint(s) of {}",
        project.name,
        revision,
        environment.endpoints.len(),
        environment.name
    ));

    let mut build_log: Box<dyn Write + Send> = match output.mode() {
        OutputMode::Normal => Box::new(io::stdout()),
        OutputMode::Quiet | OutputMode::Json => Box::new(io::sink()),
    };

    for endpoint in environment.endpoints() {
        let runtime = connect_to_runtime(&endpoint, &output).await?;
        let deployer = Deployer::new(runtime)
            .with_environment(environment.name.as_str())
            .with_events(Arc::new(output.sink()));

        let report = deployer
            .deploy(&graph, project, revision, &dockerfile, &mut *build_log)
            .await?;

        if let Some(err) = report.cascade.error() {
            output.warning(&err.to_string());
        }
        output.record(
            &json!({
                "event": "deployed",
                "project": report.project,
                "endpoint": report.endpoint,
                "image": report.image.to_string(),
                "container": report.container,
                "pruned_images": report.pruned_images,
                "removed_containers": report.removed_containers,
                "restarted": report.cascade.restarted.len(),
                "restart_failures": report.cascade.failures,
            }),
            &format!(
                "  → {} running {} as {}",
                report.endpoint,
                report.image,
                report.container.short()
            ),
        );
    }

    output.success(&format!("Deployed {} {}", project.name, revision));
    Ok(())
}
