use crate::aggregator::MetadataAggregator;
use std::{sync::Arc, time::Instant};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<MetadataAggregator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(aggregator: MetadataAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
