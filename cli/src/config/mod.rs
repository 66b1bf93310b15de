//! Configuration for the `lastsync` binary.
//!
//! A TOML file (`~/.lastsync/config.toml` unless `--config` is given) holds
//! the server bind address, named cluster profiles, aggregator tuning and
//! dashboard settings. Profiles inherit unset fields from the reserved `all`
//! profile. Environment variables override the file and command-line flags
//! override both.

mod app;
mod file;
mod profile;
mod types;

#[cfg(test)]
mod tests;

pub use app::{AppConfig, CliOverrides};
pub use file::ConfigFile;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_PROFILE: &str = "default";
pub const ALL_PROFILE: &str = "all";

pub const ENV_CLUSTER_URL: &str = "LASTSYNC_CLUSTER_URL";
pub const ENV_CLUSTER_USERNAME: &str = "LASTSYNC_CLUSTER_USERNAME";
pub const ENV_CLUSTER_PASSWORD: &str = "LASTSYNC_CLUSTER_PASSWORD";
pub const ENV_CLUSTER_API_KEY: &str = "LASTSYNC_CLUSTER_API_KEY";
pub const ENV_SERVER_URL: &str = "LASTSYNC_SERVER_URL";
