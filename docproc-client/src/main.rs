use client_core::observability::init_tracing;
use docproc_client::config::get_configuration;
use docproc_client::services::metrics::gather_metrics;
use docproc_client::startup::Workspace;
use docproc_client::sync::{InvalidationBus, PointerHub};
use docproc_client::utils::format_file_size;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("docproc-client", &configuration.logging)
        .map_err(|e| anyhow::anyhow!("Logging setup failed: {}", e))?;

    let workspace = Workspace::build(
        configuration,
        InvalidationBus::global().clone(),
        PointerHub::global().clone(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to build workspace");
        anyhow::anyhow!("Client setup failed: {}", e)
    })?;

    workspace.mount().await;

    let snapshot = workspace.list().snapshot();
    if let Some(error) = &snapshot.error {
        tracing::error!(error = %error, "Document list unavailable");
    } else if snapshot.items.is_empty() {
        info!("{}", workspace.list().empty_message());
    } else {
        for doc in &snapshot.items {
            info!(
                id = doc.id,
                filename = %doc.filename,
                status = %doc.status,
                size = %format_file_size(doc.file_size),
                tags = ?doc.tag_names(),
                "Document"
            );
        }
    }
    info!(
        total = snapshot.window.total,
        skip = snapshot.window.skip,
        has_next = snapshot.window.has_next,
        has_tags = workspace.shows_tag_manager(),
        "Document list loaded"
    );

    workspace.unmount();
    tracing::debug!(metrics = %gather_metrics(), "Request metrics");

    Ok(())
}
