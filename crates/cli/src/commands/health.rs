//! Health command
//!
//! Runs without an [`AppContext`](crate::AppContext) so that a store which
//! cannot be opened is reported instead of aborting startup.

use crate::config::OutputFormat;
use crate::output::OutputFormatter;
use cinelog_core::config::CinelogConfig;
use cinelog_core::Result;
use cinelog_infra::{ComponentHealth, HealthStatus};

/// Check the configured stores and print the outcome
pub async fn report_health(
    config: &CinelogConfig,
    out: &mut OutputFormatter<'_>,
) -> Result<HealthStatus> {
    let status = cinelog_infra::health_check(config).await;

    if out.format() != OutputFormat::Pretty {
        out.output(&status)?;
        return Ok(status);
    }

    show_component(out, "Log store", &status.log_store)?;
    show_component(out, "Catalog", &status.catalog)?;
    Ok(status)
}

fn show_component(
    out: &mut OutputFormatter<'_>,
    label: &str,
    health: &ComponentHealth,
) -> Result<()> {
    match &health.error {
        None => out.success(&format!("{} ({}) reachable", label, health.backend)),
        Some(e) => out.error(&format!("{} ({}): {}", label, health.backend, e)),
    }
}
