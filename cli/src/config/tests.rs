//! Tests for configuration loading.

use super::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
[server]
bind = "0.0.0.0:8080"

[profiles.all]
time_field = "event.created"
username = "reader"

[profiles.default]
cluster_url = "https://search.internal:9200"
password = "changeme"

[profiles.staging]
cluster_url = "https://staging:9200"
time_field = "@timestamp"
api_key = "staging-api-key"
accept_invalid_certs = true

[aggregator]
lookup_timeout_secs = 5
max_concurrent_lookups = 4

[dashboard]
server_url = "http://aggregator:8080"
refresh_interval_secs = 10
page_size = 50
"#;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    if let Err(error) = std::fs::write(&path, content) {
        panic!("failed to write config: {error}");
    }
    path
}

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(error) => panic!("failed to create temp dir: {error}"),
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

fn load(path: &Path, profile: &str, cli: &CliOverrides) -> AppConfig {
    match AppConfig::load_with_env(Some(path), profile, cli, no_env) {
        Ok(config) => config,
        Err(error) => panic!("failed to load config: {error}"),
    }
}

#[test]
fn missing_file_yields_defaults() {
    let dir = temp_dir();
    let config = load(
        &dir.path().join("absent.toml"),
        DEFAULT_PROFILE,
        &CliOverrides::default(),
    );

    assert_eq!(config.bind, "127.0.0.1:5680");
    assert_eq!(config.cluster.url, "http://127.0.0.1:9200");
    assert_eq!(config.cluster.time_field, "@timestamp");
    assert_eq!(config.lookup_timeout(), Duration::from_secs(3));
    assert_eq!(config.aggregator.max_concurrent_lookups, 16);
    assert_eq!(config.dashboard.page_size, 10);
    assert_eq!(config.refresh_interval(), Duration::from_secs(3));
    assert!(!config.cluster.accept_invalid_certs);
}

#[test]
fn default_profile_inherits_from_all() {
    let dir = temp_dir();
    let path = write_config(&dir, CONFIG);
    let config = load(&path, DEFAULT_PROFILE, &CliOverrides::default());

    assert_eq!(config.bind, "0.0.0.0:8080");
    assert_eq!(config.cluster.url, "https://search.internal:9200");
    assert_eq!(config.cluster.username.as_deref(), Some("reader"));
    assert_eq!(config.cluster.password.as_deref(), Some("changeme"));
    assert_eq!(config.cluster.time_field, "event.created");
    assert_eq!(config.aggregator_settings().max_concurrent_lookups, 4);
    assert_eq!(config.aggregator_settings().lookup_timeout, Duration::from_secs(5));
    assert_eq!(config.dashboard.server_url, "http://aggregator:8080");
}

#[test]
fn named_profile_overrides_shared_values() {
    let dir = temp_dir();
    let path = write_config(&dir, CONFIG);
    let config = load(&path, "staging", &CliOverrides::default());

    assert_eq!(config.profile_name, "staging");
    assert_eq!(config.cluster.url, "https://staging:9200");
    assert_eq!(config.cluster.time_field, "@timestamp");
    assert_eq!(config.cluster.api_key.as_deref(), Some("staging-api-key"));
    assert!(config.cluster.accept_invalid_certs);

    let es = config.elasticsearch_config();
    assert_eq!(es.url, "https://staging:9200");
    assert_eq!(es.api_key.as_deref(), Some("staging-api-key"));
    assert!(es.accept_invalid_certs);
}

#[test]
fn unknown_and_reserved_profiles_are_rejected() {
    let dir = temp_dir();
    let path = write_config(&dir, CONFIG);

    match AppConfig::load_with_env(Some(&path), "prod", &CliOverrides::default(), no_env) {
        Ok(config) => panic!("expected error, got {config:?}"),
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains("prod"));
            assert!(message.contains("staging"));
        }
    }
    assert!(
        AppConfig::load_with_env(Some(&path), ALL_PROFILE, &CliOverrides::default(), no_env)
            .is_err()
    );
}

#[test]
fn env_overrides_file_and_cli_overrides_env() {
    let dir = temp_dir();
    let path = write_config(&dir, CONFIG);
    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_CLUSTER_URL, "https://from-env:9200"),
        (ENV_CLUSTER_API_KEY, "env-key"),
        (ENV_SERVER_URL, "http://env-server:5680"),
        (ENV_CLUSTER_USERNAME, ""),
    ]);
    let lookup = |key: &str| env.get(key).map(|value| value.to_string());

    let config = match AppConfig::load_with_env(
        Some(&path),
        DEFAULT_PROFILE,
        &CliOverrides::default(),
        lookup,
    ) {
        Ok(config) => config,
        Err(error) => panic!("failed to load config: {error}"),
    };
    assert_eq!(config.cluster.url, "https://from-env:9200");
    assert_eq!(config.cluster.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.dashboard.server_url, "http://env-server:5680");
    // Empty variables are ignored.
    assert_eq!(config.cluster.username.as_deref(), Some("reader"));

    let cli = CliOverrides {
        bind: Some("127.0.0.1:9999".to_string()),
        server_url: Some("http://flag:1".to_string()),
        cluster_url: Some("http://flag-cluster:9200".to_string()),
    };
    let config = match AppConfig::load_with_env(Some(&path), DEFAULT_PROFILE, &cli, lookup) {
        Ok(config) => config,
        Err(error) => panic!("failed to load config: {error}"),
    };
    assert_eq!(config.bind, "127.0.0.1:9999");
    assert_eq!(config.dashboard.server_url, "http://flag:1");
    assert_eq!(config.cluster.url, "http://flag-cluster:9200");
}

#[test]
fn validation_rejects_bad_values() {
    let dir = temp_dir();
    for (content, needle) in [
        ("[dashboard]\npage_size = 25\n", "page_size"),
        ("[aggregator]\nlookup_timeout_secs = 0\n", "lookup_timeout_secs"),
        ("[aggregator]\nmax_concurrent_lookups = 0\n", "max_concurrent_lookups"),
        ("[dashboard]\nrefresh_interval_secs = 0\n", "refresh_interval_secs"),
        ("[profiles.default]\ncluster_url = \" \"\n", "cluster_url"),
    ] {
        let path = write_config(&dir, content);
        match AppConfig::load_with_env(Some(&path), DEFAULT_PROFILE, &CliOverrides::default(), no_env) {
            Ok(config) => panic!("expected validation error for {content:?}, got {config:?}"),
            Err(error) => assert!(
                error.to_string().contains(needle),
                "unexpected error for {content:?}: {error}"
            ),
        }
    }
}

#[test]
fn malformed_toml_reports_path() {
    let dir = temp_dir();
    let path = write_config(&dir, "[server\nbind = 1");
    match AppConfig::load_with_env(Some(&path), DEFAULT_PROFILE, &CliOverrides::default(), no_env) {
        Ok(config) => panic!("expected parse error, got {config:?}"),
        Err(error) => assert!(error.to_string().contains("failed to parse config")),
    }
}

#[test]
fn redacted_masks_secrets() {
    let dir = temp_dir();
    let path = write_config(&dir, CONFIG);
    let config = load(&path, "staging", &CliOverrides::default());
    let redacted = config.redacted();
    assert_eq!(redacted.cluster.api_key.as_deref(), Some("sta***"));
    assert_eq!(redacted.cluster.username, config.cluster.username);

    let rendered = match toml::to_string_pretty(&redacted) {
        Ok(rendered) => rendered,
        Err(error) => panic!("failed to render config: {error}"),
    };
    assert!(!rendered.contains("staging-api-key"));
}

#[test]
fn sample_config_parses_and_validates() {
    let dir = temp_dir();
    let path = write_config(&dir, &ConfigFile::sample());
    let file = match ConfigFile::load(&path) {
        Ok(file) => file,
        Err(error) => panic!("sample should parse: {error}"),
    };
    assert_eq!(file.profile_names(), vec!["default", "staging"]);

    let config = load(&path, "staging", &CliOverrides::default());
    assert!(config.cluster.accept_invalid_certs);
    assert_eq!(config.cluster.time_field, "@timestamp");
}

#[test]
fn get_config_path_prefers_explicit_path() {
    let custom = PathBuf::from("/tmp/lastsync/custom.toml");
    assert_eq!(AppConfig::get_config_path(Some(&custom)), custom);
    assert!(AppConfig::get_config_path(None).ends_with(".lastsync/config.toml"));
}

#[test]
fn preferences_path_expands_or_disables() {
    let dir = temp_dir();
    let path = write_config(
        &dir,
        "[dashboard]\npreferences_path = \"/var/lib/lastsync/prefs.json\"\n",
    );
    let config = load(&path, DEFAULT_PROFILE, &CliOverrides::default());
    assert_eq!(
        config.preferences_path(),
        Some(PathBuf::from("/var/lib/lastsync/prefs.json"))
    );

    let path = write_config(&dir, "[dashboard]\npreferences_path = \"\"\n");
    let config = load(&path, DEFAULT_PROFILE, &CliOverrides::default());
    assert_eq!(config.preferences_path(), None);
}
