//! Joins the cluster catalog with a best-effort latest-timestamp lookup per
//! index.

use crate::error::AggregateError;
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use lastsync_api::{CatalogEntry, ClusterClient};
use lastsync_shared::{AggregationResult, IndexRecord, is_system_index};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorSettings {
    pub lookup_timeout: Duration,
    pub max_concurrent_lookups: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

#[derive(Clone)]
pub struct MetadataAggregator {
    cluster: Arc<dyn ClusterClient>,
    settings: AggregatorSettings,
}

impl MetadataAggregator {
    pub fn new(cluster: Arc<dyn ClusterClient>, settings: AggregatorSettings) -> Self {
        Self { cluster, settings }
    }

    /// Builds a fresh [`AggregationResult`].
    ///
    /// Fails only when the catalog cannot be listed. Lookups that fail or
    /// exceed the timeout leave that record's timestamp empty.
    pub async fn aggregate(
        &self,
        include_system: bool,
    ) -> Result<AggregationResult, AggregateError> {
        let catalog = self.cluster.list_catalog().await.map_err(|error| {
            warn!(error = %error, "index catalog request failed");
            AggregateError::UpstreamUnavailable {
                status: error.status_code(),
                message: error.to_string(),
            }
        })?;

        let entries: Vec<CatalogEntry> = catalog
            .into_iter()
            .filter(|entry| include_system || !is_system_index(&entry.name))
            .collect();

        let limit = self.settings.max_concurrent_lookups.max(1);
        let records: Vec<IndexRecord> = stream::iter(entries)
            .map(|entry| async move {
                let last_timestamp = self.lookup_latest(&entry.name).await;
                IndexRecord::new(
                    entry.name,
                    last_timestamp,
                    entry.document_count,
                    entry.status,
                )
            })
            .buffered(limit)
            .collect()
            .await;

        let result = AggregationResult::from_records(records);
        info!(
            include_system,
            total = result.total_count,
            system = result.system_count,
            "aggregated index metadata"
        );
        Ok(result)
    }

    async fn lookup_latest(&self, index: &str) -> Option<DateTime<Utc>> {
        match tokio::time::timeout(
            self.settings.lookup_timeout,
            self.cluster.latest_timestamp(index),
        )
        .await
        {
            Ok(Ok(timestamp)) => timestamp,
            Ok(Err(error)) => {
                debug!(index = %index, error = %error, "latest timestamp lookup failed");
                None
            }
            Err(_) => {
                debug!(
                    index = %index,
                    timeout_ms = self.settings.lookup_timeout.as_millis() as u64,
                    "latest timestamp lookup timed out"
                );
                None
            }
        }
    }
}
