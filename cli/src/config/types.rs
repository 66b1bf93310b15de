use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND: &str = "127.0.0.1:5680";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5680";
pub const DEFAULT_CLUSTER_URL: &str = "http://127.0.0.1:9200";
pub const DEFAULT_PREFERENCES_PATH: &str = "~/.lastsync/preferences.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AggregatorSection {
    pub lookup_timeout_secs: u64,
    pub max_concurrent_lookups: usize,
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: 3,
            max_concurrent_lookups: 16,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardSection {
    pub server_url: String,
    pub refresh_interval_secs: u64,
    pub page_size: usize,
    pub preferences_path: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            refresh_interval_secs: 3,
            page_size: 10,
            preferences_path: DEFAULT_PREFERENCES_PATH.to_string(),
        }
    }
}
