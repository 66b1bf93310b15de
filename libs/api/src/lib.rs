use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lastsync_shared::IndexStatus;

pub mod client;
pub mod elasticsearch;
pub mod error;

pub use client::LastSyncClient;
pub use elasticsearch::{ElasticsearchClient, ElasticsearchConfig};
pub use error::{ClientError, ClusterError};

/// Summary metadata for one index, as listed by the cluster catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub document_count: u64,
    pub status: IndexStatus,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, document_count: u64, status: IndexStatus) -> Self {
        Self {
            name: name.into(),
            document_count,
            status,
        }
    }
}

/// Read-only access to the search cluster.
///
/// Implementations talk to a real cluster; tests provide in-memory fakes.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Lists every index with its document count and status.
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>, ClusterError>;

    /// Returns the tracked time field of the most recent record in `index`,
    /// or `None` when no record carries the field.
    async fn latest_timestamp(&self, index: &str) -> Result<Option<DateTime<Utc>>, ClusterError>;
}
