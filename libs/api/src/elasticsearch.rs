//! Elasticsearch-compatible REST implementation of [`ClusterClient`].
//!
//! Uses two endpoints: `_cat/indices` for the catalog and a one-hit
//! `_search` per index for the latest value of the tracked time field.

use crate::{CatalogEntry, ClusterClient, ClusterError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lastsync_shared::IndexStatus;
use lastsync_shared::time::parse_timestamp;
use lastsync_shared::tls_client::{TlsClientConfig, create_tls_client};
use reqwest::{Response, header};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIME_FIELD: &str = "@timestamp";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);
const CATALOG_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sent as `Authorization: ApiKey <key>`; wins over basic auth.
    pub api_key: Option<String>,
    pub time_field: String,
    pub lookup_timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl ElasticsearchConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            api_key: None,
            time_field: DEFAULT_TIME_FIELD.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.username = Some(username.into());
        self.password = password;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_time_field(mut self, time_field: impl Into<String>) -> Self {
        self.time_field = time_field.into();
        self
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    time_field: String,
    lookup_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CatIndexRow {
    index: String,
    #[serde(rename = "docs.count", default)]
    docs_count: Option<Value>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source", default)]
    source: Option<Value>,
    #[serde(default)]
    sort: Option<Vec<Value>>,
}

impl ElasticsearchClient {
    pub fn new(config: ElasticsearchConfig) -> Result<Self, ClusterError> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClusterError::Config("cluster url is required".to_string()));
        }
        if config.time_field.trim().is_empty() {
            return Err(ClusterError::Config("time field cannot be empty".to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("lastsync/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|e| ClusterError::Config(e.to_string()))?,
        );
        if let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("ApiKey {api_key}"))
                .map_err(|e| ClusterError::Config(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = create_tls_client(
            TlsClientConfig::default()
                .with_headers(headers)
                .with_timeout(CATALOG_REQUEST_TIMEOUT)
                .with_accept_invalid_certs(config.accept_invalid_certs),
        )
        .map_err(ClusterError::Config)?;

        // The API key header already authenticates every request.
        let (username, password) = if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            (None, None)
        } else {
            (config.username, config.password)
        };

        Ok(Self {
            http,
            base_url,
            username,
            password,
            time_field: config.time_field,
            lookup_timeout: config.lookup_timeout,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_ref()),
            None => request,
        }
    }

    fn search_body(&self) -> Value {
        json!({
            "size": 1,
            "sort": [{ self.time_field.as_str(): { "order": "desc" } }],
            "_source": [self.time_field.as_str()],
            "timeout": format!("{}ms", self.lookup_timeout.as_millis()),
        })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ClusterError> {
        let response = handle_response_error(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClusterError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClusterClient for ElasticsearchClient {
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>, ClusterError> {
        let url = format!("{}/_cat/indices", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("h", "index,docs.count,status")]);
        let response = self.authorize(request).send().await?;
        let rows: Vec<CatIndexRow> = self.handle_response(response).await?;

        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }

    async fn latest_timestamp(&self, index: &str) -> Result<Option<DateTime<Utc>>, ClusterError> {
        let url = format!(
            "{}/{}/_search",
            self.base_url,
            urlencoding::encode(index)
        );
        let request = self
            .http
            .post(&url)
            .query(&[("ignore_unavailable", "true")])
            .timeout(self.lookup_timeout)
            .json(&self.search_body());
        let response = self.authorize(request).send().await?;
        let search: SearchResponse = self.handle_response(response).await?;

        let timestamp = search
            .hits
            .hits
            .first()
            .and_then(|hit| extract_hit_timestamp(hit, &self.time_field));

        debug!(index = %index, found = timestamp.is_some(), "latest timestamp lookup finished");
        Ok(timestamp)
    }
}

impl From<CatIndexRow> for CatalogEntry {
    fn from(row: CatIndexRow) -> Self {
        CatalogEntry {
            document_count: row.docs_count.as_ref().map(parse_doc_count).unwrap_or(0),
            status: IndexStatus::from(row.status.unwrap_or_default()),
            name: row.index,
        }
    }
}

/// `docs.count` arrives as a string, a number, or null for closed indices.
fn parse_doc_count(value: &Value) -> u64 {
    match value {
        Value::String(text) => text.trim().parse::<u64>().unwrap_or(0),
        Value::Number(number) => number.as_u64().unwrap_or(0),
        _ => 0,
    }
}

fn extract_hit_timestamp(hit: &SearchHit, time_field: &str) -> Option<DateTime<Utc>> {
    // The sort value is the normalized date in epoch millis; `_source` keeps
    // whatever unit the document was indexed with.
    if let Some(values) = hit.sort.as_ref() {
        return values.first().and_then(parse_timestamp);
    }

    hit.source
        .as_ref()
        .and_then(|source| lookup_field(source, time_field))
        .and_then(parse_timestamp)
}

/// Resolves `field` either as a literal key or as a dotted object path.
fn lookup_field<'a>(source: &'a Value, field: &str) -> Option<&'a Value> {
    if let Some(value) = source.get(field) {
        return Some(value);
    }

    field
        .split('.')
        .try_fold(source, |current, segment| current.get(segment))
}

async fn handle_response_error(response: Response) -> Result<Response, ClusterError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    Err(ClusterError::Api {
        status,
        message: extract_error_reason(&body),
    })
}

/// Pulls `error.reason` (or `error` as a string) out of an error body.
fn extract_error_reason(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("reason")
            .and_then(Value::as_str)
            .or_else(|| error.get("type").and_then(Value::as_str))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| body.trim().to_string()),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use std::collections::HashMap;
    use std::net::SocketAddr;

    async fn spawn_cluster(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(error) => panic!("failed to bind listener: {error}"),
        };
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(error) => panic!("failed to read local addr: {error}"),
        };
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, handle)
    }

    fn client_for(addr: SocketAddr) -> ElasticsearchClient {
        match ElasticsearchClient::new(ElasticsearchConfig::new(format!("http://{addr}/"))) {
            Ok(client) => client,
            Err(error) => panic!("failed to create client: {error}"),
        }
    }

    async fn cat_indices(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        assert_eq!(params.get("format").map(String::as_str), Some("json"));
        assert_eq!(
            params.get("h").map(String::as_str),
            Some("index,docs.count,status")
        );
        Json(json!([
            { "index": ".kibana", "docs.count": "5", "status": "open" },
            { "index": "logs-2024", "docs.count": "100", "status": "open" },
            { "index": "logs-2023", "docs.count": null, "status": "close" },
        ]))
    }

    async fn search(
        Path(index): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        assert_eq!(
            params.get("ignore_unavailable").map(String::as_str),
            Some("true")
        );
        assert_eq!(body.get("size"), Some(&json!(1)));
        assert_eq!(
            body.get("sort"),
            Some(&json!([{ "@timestamp": { "order": "desc" } }]))
        );
        assert_eq!(body.get("_source"), Some(&json!(["@timestamp"])));

        match index.as_str() {
            "logs-2024" => Json(json!({
                "hits": { "hits": [{ "_source": { "@timestamp": "2024-05-01T12:30:00Z" } }] }
            }))
            .into_response(),
            "metrics" => Json(json!({
                "hits": { "hits": [{ "_source": {}, "sort": [1_714_566_600_000_i64] }] }
            }))
            .into_response(),
            "epoch-seconds" => Json(json!({
                "hits": { "hits": [{
                    "_source": { "@timestamp": 1_714_566_600_i64 },
                    "sort": [1_714_566_600_000_i64]
                }] }
            }))
            .into_response(),
            "empty" => Json(json!({ "hits": { "hits": [] } })).into_response(),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": { "type": "index_closed_exception", "reason": "closed" },
                    "status": 400
                })),
            )
                .into_response(),
        }
    }

    #[tokio::test]
    async fn list_catalog_parses_cat_rows() {
        let app = Router::new().route("/_cat/indices", get(cat_indices));
        let (addr, server) = spawn_cluster(app).await;

        let catalog = match client_for(addr).list_catalog().await {
            Ok(catalog) => catalog,
            Err(error) => panic!("catalog request failed: {error}"),
        };

        assert_eq!(
            catalog,
            vec![
                CatalogEntry::new(".kibana", 5, IndexStatus::Open),
                CatalogEntry::new("logs-2024", 100, IndexStatus::Open),
                CatalogEntry::new("logs-2023", 0, IndexStatus::Closed),
            ]
        );
        server.abort();
    }

    #[tokio::test]
    async fn latest_timestamp_reads_sort_then_source_values() {
        let app = Router::new().route("/{index}/_search", post(search));
        let (addr, server) = spawn_cluster(app).await;
        let client = client_for(addr);

        let expected = DateTime::<Utc>::from_timestamp(1_714_566_600, 0);

        match client.latest_timestamp("logs-2024").await {
            Ok(timestamp) => assert_eq!(timestamp, expected),
            Err(error) => panic!("lookup failed: {error}"),
        }
        match client.latest_timestamp("metrics").await {
            Ok(timestamp) => assert_eq!(timestamp, expected),
            Err(error) => panic!("lookup failed: {error}"),
        }
        match client.latest_timestamp("epoch-seconds").await {
            Ok(timestamp) => assert_eq!(timestamp, expected),
            Err(error) => panic!("lookup failed: {error}"),
        }
        match client.latest_timestamp("empty").await {
            Ok(timestamp) => assert_eq!(timestamp, None),
            Err(error) => panic!("lookup failed: {error}"),
        }
        server.abort();
    }

    #[tokio::test]
    async fn latest_timestamp_surfaces_cluster_errors() {
        let app = Router::new().route("/{index}/_search", post(search));
        let (addr, server) = spawn_cluster(app).await;

        match client_for(addr).latest_timestamp("closed-index").await {
            Ok(value) => panic!("expected error, got {value:?}"),
            Err(error) => {
                assert_eq!(error.status_code(), Some(400));
                assert!(error.to_string().contains("closed"));
            }
        }
        server.abort();
    }

    #[tokio::test]
    async fn catalog_failure_keeps_upstream_status() {
        let app = Router::new().route(
            "/_cat/indices",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": {
                            "type": "security_exception",
                            "reason": "missing authentication credentials"
                        },
                        "status": 401
                    })),
                )
            }),
        );
        let (addr, server) = spawn_cluster(app).await;

        match client_for(addr).list_catalog().await {
            Ok(catalog) => panic!("expected error, got {catalog:?}"),
            Err(ClusterError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "missing authentication credentials");
            }
            Err(error) => panic!("unexpected error variant: {error}"),
        }
        server.abort();
    }

    #[tokio::test]
    async fn api_key_header_is_sent() {
        let app = Router::new().route(
            "/_cat/indices",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    == Some("ApiKey secret-key");
                if authorized {
                    Json(json!([])).into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        );
        let (addr, server) = spawn_cluster(app).await;

        let client = match ElasticsearchClient::new(
            ElasticsearchConfig::new(format!("http://{addr}"))
                .with_basic_auth("elastic", Some("ignored".to_string()))
                .with_api_key("secret-key"),
        ) {
            Ok(client) => client,
            Err(error) => panic!("failed to create client: {error}"),
        };

        match client.list_catalog().await {
            Ok(catalog) => assert!(catalog.is_empty()),
            Err(error) => panic!("catalog request failed: {error}"),
        }
        server.abort();
    }

    #[test]
    fn rejects_empty_url() {
        assert!(matches!(
            ElasticsearchClient::new(ElasticsearchConfig::new("  ")),
            Err(ClusterError::Config(_))
        ));
    }

    #[test]
    fn dotted_time_fields_resolve_nested_sources() {
        let source = json!({ "event": { "created": "2024-05-01T12:30:00Z" } });
        assert_eq!(
            lookup_field(&source, "event.created"),
            Some(&json!("2024-05-01T12:30:00Z"))
        );

        let flat = json!({ "event.created": "flat" });
        assert_eq!(lookup_field(&flat, "event.created"), Some(&json!("flat")));
        assert_eq!(lookup_field(&source, "event.missing"), None);
    }

    #[test]
    fn sort_value_wins_over_source_units() {
        let hit: SearchHit = match serde_json::from_value(json!({
            "_source": { "@timestamp": 1_714_566_600_i64 },
            "sort": [1_714_566_600_000_i64]
        })) {
            Ok(hit) => hit,
            Err(error) => panic!("hit should deserialize: {error}"),
        };
        assert_eq!(
            extract_hit_timestamp(&hit, "@timestamp"),
            DateTime::<Utc>::from_timestamp(1_714_566_600, 0)
        );

        let source_only: SearchHit = match serde_json::from_value(json!({
            "_source": { "@timestamp": "2024-05-01T12:30:00Z" }
        })) {
            Ok(hit) => hit,
            Err(error) => panic!("hit should deserialize: {error}"),
        };
        assert_eq!(
            extract_hit_timestamp(&source_only, "@timestamp"),
            DateTime::<Utc>::from_timestamp(1_714_566_600, 0)
        );
    }

    #[test]
    fn doc_count_tolerates_strings_numbers_and_null() {
        assert_eq!(parse_doc_count(&json!("12")), 12);
        assert_eq!(parse_doc_count(&json!(7)), 7);
        assert_eq!(parse_doc_count(&json!(null)), 0);
        assert_eq!(parse_doc_count(&json!("n/a")), 0);
    }

    #[test]
    fn error_reason_extraction() {
        assert_eq!(
            extract_error_reason(r#"{"error":{"type":"t","reason":"r"}}"#),
            "r"
        );
        assert_eq!(extract_error_reason(r#"{"error":"plain"}"#), "plain");
        assert_eq!(extract_error_reason("gateway timeout"), "gateway timeout");
    }
}
