use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use commands::Commands;
use config::{AppConfig, DEFAULT_PROFILE};
use lastsync_shared::utils::lastsync_home;
use logging::{LogTarget, init_logging};

#[derive(Parser, PartialEq, Debug)]
#[command(name = "lastsync")]
#[command(about = "Index freshness dashboard for search clusters", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ~/.lastsync/config.toml)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Configuration profile to use
    #[arg(
        long = "profile",
        env = "LASTSYNC_PROFILE",
        default_value = DEFAULT_PROFILE,
        global = true
    )]
    profile: String,

    /// Enable debug output
    #[arg(long = "debug", default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command;

    if !command.requires_config() {
        match command {
            Commands::Version => commands::print_version(),
            _ => commands::print_sample_config(),
        }
        return;
    }

    let log_dir = lastsync_home().join("logs");
    let target = if command.is_dashboard() {
        LogTarget::File(&log_dir)
    } else {
        LogTarget::Stderr
    };
    let default_level = if command.is_serve() { "info" } else { "warn" };
    let _log_guard = init_logging(target, cli.debug, default_level);

    let overrides = command.cli_overrides();
    let config = match AppConfig::load(cli.config.as_deref(), &cli.profile, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(
        profile = %config.profile_name,
        path = %config.config_path.display(),
        "configuration loaded"
    );

    if let Err(e) = command.run(config).await {
        eprintln!("Ops! something went wrong: {}", e);
        std::process::exit(1);
    }
}
