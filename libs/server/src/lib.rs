pub mod aggregator;
pub mod error;
pub mod routes;
pub mod state;

pub use aggregator::{AggregatorSettings, MetadataAggregator};
pub use error::AggregateError;
pub use routes::router;
pub use state::AppState;
