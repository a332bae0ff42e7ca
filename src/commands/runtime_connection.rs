// ABOUTME: Shared helper for connecting to runtime endpoints.
// ABOUTME: Used by deploy, clean, and status commands.

use dockership::error::Result;
use dockership::output::Output;
use dockership::runtime::{BollardRuntime, Endpoint};

/// Connect to one endpoint of the active environment and check it answers.
pub async fn connect_to_runtime(endpoint: &Endpoint, output: &Output) -> Result<BollardRuntime> {
    output.progress(&format!("  → Connecting to {}...", endpoint.address));
    let runtime = BollardRuntime::open(endpoint).await?;
    Ok(runtime)
}
