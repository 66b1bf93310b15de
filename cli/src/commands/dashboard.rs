use std::path::PathBuf;
use std::sync::Arc;

use lastsync_api::LastSyncClient;
use lastsync_tui::{
    DashboardOptions, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, run_dashboard,
};

use crate::config::AppConfig;

pub async fn run_dashboard_command(config: &AppConfig) -> Result<(), String> {
    let client = LastSyncClient::new(config.dashboard.server_url.clone())
        .map_err(|e| format!("Failed to create client: {}", e))?;
    let preferences_path = config.preferences_path();

    tracing::debug!(
        server = %config.dashboard.server_url,
        preferences = ?preferences_path,
        "starting dashboard"
    );

    run_dashboard(DashboardOptions {
        client,
        store: preference_store(preferences_path),
        refresh_interval: config.refresh_interval(),
        page_size: config.dashboard.page_size,
    })
    .await
    .map_err(|e| format!("Dashboard failed: {}", e))
}

fn preference_store(path: Option<PathBuf>) -> Arc<dyn PreferenceStore> {
    match path {
        Some(path) => Arc::new(FilePreferenceStore::new(path)),
        None => Arc::new(MemoryPreferenceStore::new()),
    }
}
