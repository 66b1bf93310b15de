//! On-disk layout of `config.toml`.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::profile::ProfileConfig;
use super::types::{AggregatorSection, DEFAULT_CLUSTER_URL, DashboardSection, ServerSection};
use super::{ALL_PROFILE, DEFAULT_PROFILE};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub profiles: BTreeMap<String, ProfileConfig>,
    pub aggregator: AggregatorSection,
    pub dashboard: DashboardSection,
}

impl ConfigFile {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|error| anyhow!("failed to parse config {}: {error}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow!("failed to read config {}: {error}", path.display())),
        }
    }

    pub(crate) fn profile_config(&self, profile_name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(profile_name)
    }

    /// The named profile with unset fields taken from `all`. The `default`
    /// profile may be absent, in which case only `all` applies.
    pub(crate) fn resolved_profile_config(&self, profile_name: &str) -> Result<ProfileConfig> {
        if profile_name == ALL_PROFILE {
            return Err(anyhow!(
                "cannot use '{ALL_PROFILE}' as a profile name; it is reserved for shared defaults"
            ));
        }

        let profile = match self.profile_config(profile_name) {
            Some(profile) => profile.clone(),
            None if profile_name == DEFAULT_PROFILE => ProfileConfig::default(),
            None => {
                return Err(anyhow!(
                    "profile '{profile_name}' not found in configuration (available: {})",
                    self.profile_names().join(", ")
                ));
            }
        };

        Ok(profile.merge(self.profile_config(ALL_PROFILE)))
    }

    pub fn profile_names(&self) -> Vec<String> {
        self.profiles
            .keys()
            .filter(|name| name.as_str() != ALL_PROFILE)
            .cloned()
            .collect()
    }

    /// A complete commented example, printed by `lastsync config sample`.
    pub fn sample() -> String {
        let defaults = ConfigFile::default();
        format!(
            r#"# lastsync configuration

[server]
# Address the aggregator HTTP server listens on
bind = "{bind}"

# Values here are inherited by every other profile
[profiles.all]
time_field = "@timestamp"
accept_invalid_certs = false

[profiles.default]
cluster_url = "{cluster_url}"
# username = "elastic"
# password = "changeme"
# api_key takes precedence over username/password
# api_key = "base64-encoded-key"

[profiles.staging]
cluster_url = "https://staging-search.internal:9200"
accept_invalid_certs = true

[aggregator]
# Per-index latest-record lookup timeout
lookup_timeout_secs = {lookup_timeout_secs}
# Upper bound on lookups in flight per request
max_concurrent_lookups = {max_concurrent_lookups}

[dashboard]
server_url = "{server_url}"
refresh_interval_secs = {refresh_interval_secs}
# One of 10, 20, 50, 100
page_size = {page_size}
# Leave empty to keep the toggles in memory only
preferences_path = "{preferences_path}"
"#,
            bind = defaults.server.bind,
            cluster_url = DEFAULT_CLUSTER_URL,
            lookup_timeout_secs = defaults.aggregator.lookup_timeout_secs,
            max_concurrent_lookups = defaults.aggregator.max_concurrent_lookups,
            server_url = defaults.dashboard.server_url,
            refresh_interval_secs = defaults.dashboard.refresh_interval_secs,
            page_size = defaults.dashboard.page_size,
            preferences_path = defaults.dashboard.preferences_path,
        )
    }
}
