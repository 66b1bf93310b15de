use crate::{error::AggregateError, state::AppState};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use lastsync_shared::{AggregationResult, ApiErrorBody, HealthResponse};
use serde::Deserialize;
use tracing::warn;

pub const INDICES_PATH: &str = "/indices";
/// Path the dashboard plugin historically served the endpoint from.
pub const LEGACY_INDICES_PATH: &str = "/api/index_last_synced/indices";

#[derive(Debug, Default, Deserialize)]
struct IndicesParams {
    #[serde(default, rename = "includeSystem")]
    include_system: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(INDICES_PATH, get(indices_handler))
        .route(LEGACY_INDICES_PATH, get(indices_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

async fn indices_handler(
    State(state): State<AppState>,
    Query(params): Query<IndicesParams>,
) -> Result<Json<AggregationResult>, Response> {
    let include_system = match params.include_system.as_deref() {
        None => false,
        Some(raw) => parse_bool_param(raw).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                &format!("includeSystem must be true or false, got '{raw}'"),
            )
        })?,
    };

    state
        .aggregator
        .aggregate(include_system)
        .await
        .map(Json)
        .map_err(|error| aggregate_error_response(&error))
}

fn parse_bool_param(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Some(false),
        "true" | "1" => Some(true),
        _ => None,
    }
}

fn aggregate_error_response(error: &AggregateError) -> Response {
    let status = error
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    warn!(status = status.as_u16(), error = %error, "index aggregation failed");
    api_error(status, &error.to_string())
}

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = ApiErrorBody {
        message: message.to_string(),
    };

    (status, Json(body)).into_response()
}
