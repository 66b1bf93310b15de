//! Index freshness models shared by the aggregator server and its clients.
//!
//! The wire format follows the JSON the dashboard has always consumed:
//! camelCase keys, `docCount` for the document count and a derived
//! `isSystemIndex` flag that is recomputed from the name on both ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names starting with this character are reserved for the platform.
pub const SYSTEM_INDEX_PREFIX: char = '.';

/// Whether `name` follows the reserved system-index naming convention.
pub fn is_system_index(name: &str) -> bool {
    name.starts_with(SYSTEM_INDEX_PREFIX)
}

/// Cluster-reported index state.
///
/// The cluster reports `close` for closed indices; `closed` is accepted too.
/// Anything else is kept verbatim (lowercased) so the UI can still show it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexStatus {
    Open,
    Closed,
    Other(String),
}

impl IndexStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IndexStatus::Open => "open",
            IndexStatus::Closed => "closed",
            IndexStatus::Other(value) => value,
        }
    }
}

impl From<String> for IndexStatus {
    fn from(value: String) -> Self {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "open" => IndexStatus::Open,
            "close" | "closed" => IndexStatus::Closed,
            _ => IndexStatus::Other(value),
        }
    }
}

impl From<&str> for IndexStatus {
    fn from(value: &str) -> Self {
        IndexStatus::from(value.to_string())
    }
}

impl From<IndexStatus> for String {
    fn from(value: IndexStatus) -> Self {
        match value {
            IndexStatus::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness metadata for one index.
///
/// Records are built once per aggregation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexRecordWire", into = "IndexRecordWire")]
pub struct IndexRecord {
    pub name: String,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub document_count: u64,
    pub status: IndexStatus,
}

impl IndexRecord {
    pub fn new(
        name: impl Into<String>,
        last_timestamp: Option<DateTime<Utc>>,
        document_count: u64,
        status: IndexStatus,
    ) -> Self {
        Self {
            name: name.into(),
            last_timestamp,
            document_count,
            status,
        }
    }

    pub fn is_system_index(&self) -> bool {
        is_system_index(&self.name)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexRecordWire {
    name: String,
    #[serde(default)]
    last_timestamp: Option<DateTime<Utc>>,
    #[serde(default, alias = "documentCount")]
    doc_count: u64,
    status: IndexStatus,
    // Ignored on input; the flag is always derived from the name.
    #[serde(default)]
    is_system_index: bool,
}

impl From<IndexRecordWire> for IndexRecord {
    fn from(wire: IndexRecordWire) -> Self {
        IndexRecord {
            name: wire.name,
            last_timestamp: wire.last_timestamp,
            document_count: wire.doc_count,
            status: wire.status,
        }
    }
}

impl From<IndexRecord> for IndexRecordWire {
    fn from(record: IndexRecord) -> Self {
        let is_system_index = record.is_system_index();
        IndexRecordWire {
            name: record.name,
            last_timestamp: record.last_timestamp,
            doc_count: record.document_count,
            status: record.status,
            is_system_index,
        }
    }
}

/// One aggregation pass over the cluster catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    #[serde(default)]
    pub indices: Vec<IndexRecord>,
    #[serde(rename = "totalIndices", default)]
    pub total_count: usize,
    #[serde(rename = "systemIndices", default)]
    pub system_count: usize,
}

impl AggregationResult {
    /// Builds a result whose counters are derived from `indices`.
    pub fn from_records(indices: Vec<IndexRecord>) -> Self {
        let system_count = indices
            .iter()
            .filter(|record| record.is_system_index())
            .count();
        Self {
            total_count: indices.len(),
            system_count,
            indices,
        }
    }
}

/// Error body returned by the aggregator on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
