use anyhow::{Result, anyhow};
use lastsync_api::ElasticsearchConfig;
use lastsync_api::elasticsearch::DEFAULT_TIME_FIELD;
use lastsync_server::AggregatorSettings;
use lastsync_shared::utils::{expand_tilde_path, lastsync_home, redact_secret};
use lastsync_tui::PAGE_SIZES;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::file::ConfigFile;
use super::types::{AggregatorSection, DEFAULT_CLUSTER_URL, DashboardSection};
use super::{
    CONFIG_FILE_NAME, ENV_CLUSTER_API_KEY, ENV_CLUSTER_PASSWORD, ENV_CLUSTER_URL,
    ENV_CLUSTER_USERNAME, ENV_SERVER_URL,
};

/// Values taken from command-line flags; they win over file and env.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub server_url: Option<String>,
    pub cluster_url: Option<String>,
}

/// Cluster connection settings after profile resolution and overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSettings {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub accept_invalid_certs: bool,
    pub time_field: String,
}

/// Fully resolved configuration used by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub profile_name: String,
    pub config_path: PathBuf,
    pub bind: String,
    pub cluster: ClusterSettings,
    pub aggregator: AggregatorSection,
    pub dashboard: DashboardSection,
}

impl AppConfig {
    pub fn load(
        config_path: Option<&Path>,
        profile_name: &str,
        cli: &CliOverrides,
    ) -> Result<Self> {
        Self::load_with_env(config_path, profile_name, cli, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable environment lookup.
    pub fn load_with_env(
        config_path: Option<&Path>,
        profile_name: &str,
        cli: &CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_path = Self::get_config_path(config_path);
        let file = ConfigFile::load(&config_path)?;
        let profile = file.resolved_profile_config(profile_name)?;

        let mut config = AppConfig {
            profile_name: profile_name.to_string(),
            config_path,
            bind: file.server.bind,
            cluster: ClusterSettings {
                url: profile
                    .cluster_url
                    .unwrap_or_else(|| DEFAULT_CLUSTER_URL.to_string()),
                username: profile.username,
                password: profile.password,
                api_key: profile.api_key,
                accept_invalid_certs: profile.accept_invalid_certs.unwrap_or(false),
                time_field: profile
                    .time_field
                    .unwrap_or_else(|| DEFAULT_TIME_FIELD.to_string()),
            },
            aggregator: file.aggregator,
            dashboard: file.dashboard,
        };

        config.apply_env_overrides(env);
        config.apply_cli_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn get_config_path(path: Option<&Path>) -> PathBuf {
        match path {
            Some(path) => expand_tilde_path(path),
            None => lastsync_home().join(CONFIG_FILE_NAME),
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = env(ENV_CLUSTER_URL) {
            self.cluster.url = value;
        }
        if let Some(value) = env(ENV_CLUSTER_USERNAME) {
            self.cluster.username = Some(value);
        }
        if let Some(value) = env(ENV_CLUSTER_PASSWORD) {
            self.cluster.password = Some(value);
        }
        if let Some(value) = env(ENV_CLUSTER_API_KEY) {
            self.cluster.api_key = Some(value);
        }
        if let Some(value) = env(ENV_SERVER_URL) {
            self.dashboard.server_url = value;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(bind) = &cli.bind {
            self.bind = bind.clone();
        }
        if let Some(url) = &cli.server_url {
            self.dashboard.server_url = url.clone();
        }
        if let Some(url) = &cli.cluster_url {
            self.cluster.url = url.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cluster.url.trim().is_empty() {
            return Err(anyhow!("cluster_url cannot be empty"));
        }
        if self.cluster.time_field.trim().is_empty() {
            return Err(anyhow!("time_field cannot be empty"));
        }
        if self.bind.trim().is_empty() {
            return Err(anyhow!("server.bind cannot be empty"));
        }
        if self.dashboard.server_url.trim().is_empty() {
            return Err(anyhow!("dashboard.server_url cannot be empty"));
        }
        if self.aggregator.lookup_timeout_secs == 0 {
            return Err(anyhow!("aggregator.lookup_timeout_secs must be greater than 0"));
        }
        if self.aggregator.max_concurrent_lookups == 0 {
            return Err(anyhow!(
                "aggregator.max_concurrent_lookups must be greater than 0"
            ));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(anyhow!(
                "dashboard.refresh_interval_secs must be greater than 0"
            ));
        }
        if !PAGE_SIZES.contains(&self.dashboard.page_size) {
            return Err(anyhow!(
                "dashboard.page_size must be one of {PAGE_SIZES:?}, got {}",
                self.dashboard.page_size
            ));
        }
        Ok(())
    }

    pub fn elasticsearch_config(&self) -> ElasticsearchConfig {
        let mut config = ElasticsearchConfig::new(self.cluster.url.clone())
            .with_time_field(self.cluster.time_field.clone())
            .with_lookup_timeout(self.lookup_timeout())
            .with_accept_invalid_certs(self.cluster.accept_invalid_certs);
        if let Some(username) = &self.cluster.username {
            config = config.with_basic_auth(username.clone(), self.cluster.password.clone());
        }
        if let Some(api_key) = &self.cluster.api_key {
            config = config.with_api_key(api_key.clone());
        }
        config
    }

    pub fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings {
            lookup_timeout: self.lookup_timeout(),
            max_concurrent_lookups: self.aggregator.max_concurrent_lookups,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.aggregator.lookup_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_interval_secs)
    }

    /// `None` when `dashboard.preferences_path` is empty: toggles then live
    /// only for the session.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        let path = self.dashboard.preferences_path.trim();
        if path.is_empty() {
            return None;
        }
        Some(expand_tilde_path(Path::new(path)))
    }

    /// A copy safe to print: secrets are masked.
    pub fn redacted(&self) -> AppConfig {
        let mut config = self.clone();
        config.cluster.password = config.cluster.password.as_deref().map(redact_secret);
        config.cluster.api_key = config.cluster.api_key.as_deref().map(redact_secret);
        config
    }
}
