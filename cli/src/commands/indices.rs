use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use lastsync_api::{ClusterClient, ElasticsearchClient, LastSyncClient};
use lastsync_server::MetadataAggregator;
use lastsync_shared::time::{format_count, format_last_time};
use lastsync_shared::{AggregationResult, IndexRecord};
use tabled::settings::{Alignment, Style, object::Columns};
use tabled::{Table, Tabled};

use crate::config::AppConfig;

pub struct IndicesOptions {
    pub include_system: bool,
    pub json: bool,
    /// Skip the server and aggregate against the cluster in-process.
    pub direct: bool,
}

pub async fn run_indices(config: &AppConfig, options: IndicesOptions) -> Result<(), String> {
    let result = if options.direct {
        fetch_direct(config, options.include_system).await?
    } else {
        let client = LastSyncClient::new(config.dashboard.server_url.clone())
            .map_err(|e| format!("Failed to create client: {}", e))?;
        client
            .list_indices(options.include_system)
            .await
            .map_err(|e| format!("Failed to fetch indices: {}", e))?
    };

    if options.json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to encode result: {}", e))?;
        println!("{rendered}");
    } else {
        print!("{}", render_table(&result, Utc::now(), &Local));
    }
    Ok(())
}

async fn fetch_direct(
    config: &AppConfig,
    include_system: bool,
) -> Result<AggregationResult, String> {
    let cluster = ElasticsearchClient::new(config.elasticsearch_config())
        .map_err(|e| format!("Failed to create cluster client: {}", e))?;
    let cluster: Arc<dyn ClusterClient> = Arc::new(cluster);
    MetadataAggregator::new(cluster, config.aggregator_settings())
        .aggregate(include_system)
        .await
        .map_err(|e| format!("Failed to fetch indices: {}", e))
}

#[derive(Tabled)]
struct IndexRow {
    #[tabled(rename = "INDEX")]
    name: String,
    #[tabled(rename = "LAST RECORD")]
    last_record: String,
    #[tabled(rename = "DOCUMENTS")]
    documents: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl IndexRow {
    fn from_record<Tz>(record: &IndexRecord, now: DateTime<Utc>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        IndexRow {
            name: record.name.clone(),
            last_record: record
                .last_timestamp
                .map(|timestamp| format_last_time(timestamp, now, tz))
                .unwrap_or_else(|| "N/A".to_string()),
            documents: format_count(record.document_count),
            status: record.status.to_string(),
        }
    }
}

/// Plain-text table followed by a one-line summary.
pub fn render_table<Tz>(result: &AggregationResult, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if result.indices.is_empty() {
        return "No indices found.\n".to_string();
    }

    let rows = result
        .indices
        .iter()
        .map(|record| IndexRow::from_record(record, now, tz));
    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .modify(Columns::single(2), Alignment::right());

    format!(
        "{table}\n\n{} indices ({} system)\n",
        result.total_count, result.system_count
    )
}
