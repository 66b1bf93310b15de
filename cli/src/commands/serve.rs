use std::sync::Arc;

use lastsync_api::{ClusterClient, ElasticsearchClient};
use lastsync_server::{AppState, MetadataAggregator, router};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

pub async fn run_serve(config: &AppConfig) -> Result<(), String> {
    let cluster = ElasticsearchClient::new(config.elasticsearch_config())
        .map_err(|e| format!("Failed to create cluster client: {}", e))?;
    let cluster: Arc<dyn ClusterClient> = Arc::new(cluster);
    let aggregator = MetadataAggregator::new(cluster, config.aggregator_settings());
    let app = router(AppState::new(aggregator));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind, e))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to inspect listener address: {}", e))?;

    println!("lastsync server listening on http://{}", local_addr);
    println!("Profile: {}", config.profile_name);
    println!("Cluster: {}", config.cluster.url);
    tracing::info!(
        bind = %local_addr,
        cluster = %config.cluster.url,
        time_field = %config.cluster.time_field,
        "aggregator server started"
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {}", error);
        }
        signal_cancel.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    tracing::info!("aggregator server stopped");
    Ok(())
}
