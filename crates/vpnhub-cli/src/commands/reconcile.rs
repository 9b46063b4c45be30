//! Counter reconciliation command.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;
use vpnhub_service::CounterReconciler;

/// Drift display row
#[derive(Debug, Serialize, Tabled)]
struct DriftRow {
    server_id: String,
    server_name: String,
    recorded: i32,
    actual: i32,
}

/// Recompute every server's counter and print the corrections.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let drifts = CounterReconciler::new(store.connections.clone())
        .reconcile()
        .await?;
    store.close().await;

    if drifts.is_empty() && format == OutputFormat::Table {
        output::print_success("All server counters match active connections");
        return Ok(());
    }

    let rows: Vec<DriftRow> = drifts
        .into_iter()
        .map(|d| DriftRow {
            server_id: d.server_id.to_string(),
            server_name: d.server_name,
            recorded: d.recorded,
            actual: d.actual,
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
