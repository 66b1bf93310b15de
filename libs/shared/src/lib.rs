pub mod models;
pub mod time;
pub mod tls_client;
pub mod utils;

pub use models::health::HealthResponse;
pub use models::index::{
    AggregationResult, ApiErrorBody, IndexRecord, IndexStatus, SYSTEM_INDEX_PREFIX,
    is_system_index,
};
