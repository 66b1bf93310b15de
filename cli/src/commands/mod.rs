use clap::Subcommand;

use crate::config::{AppConfig, CliOverrides, ConfigFile};

pub mod dashboard;
pub mod indices;
pub mod serve;

#[derive(Subcommand, PartialEq, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration with secrets masked
    Show,
    /// Print a complete sample configuration file
    Sample,
}

#[derive(Subcommand, PartialEq, Debug)]
pub enum Commands {
    /// Get CLI version
    Version,

    /// Start the aggregator HTTP server
    Serve {
        /// Bind address, e.g. 127.0.0.1:5680
        #[arg(long)]
        bind: Option<String>,

        /// Search cluster base URL
        #[arg(long)]
        cluster_url: Option<String>,
    },

    /// Open the interactive freshness dashboard
    Dashboard {
        /// Aggregator server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Print index freshness once and exit
    Indices {
        /// Include system indices (names starting with '.')
        #[arg(long, default_value_t = false)]
        include_system: bool,

        /// Print the raw JSON result
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Aggregator server URL
        #[arg(long)]
        url: Option<String>,

        /// Query the search cluster directly instead of a running server
        #[arg(long, default_value_t = false)]
        direct: bool,

        /// Search cluster base URL (with --direct)
        #[arg(long)]
        cluster_url: Option<String>,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Commands {
    /// Commands that never touch the config file.
    pub fn requires_config(&self) -> bool {
        !matches!(
            self,
            Commands::Version | Commands::Config(ConfigCommands::Sample)
        )
    }

    /// The dashboard draws on the terminal, so its logs go to a file.
    pub fn is_dashboard(&self) -> bool {
        matches!(self, Commands::Dashboard { .. })
    }

    pub fn is_serve(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }

    pub fn cli_overrides(&self) -> CliOverrides {
        match self {
            Commands::Serve { bind, cluster_url } => CliOverrides {
                bind: bind.clone(),
                cluster_url: cluster_url.clone(),
                ..Default::default()
            },
            Commands::Dashboard { url } => CliOverrides {
                server_url: url.clone(),
                ..Default::default()
            },
            Commands::Indices {
                url, cluster_url, ..
            } => CliOverrides {
                server_url: url.clone(),
                cluster_url: cluster_url.clone(),
                ..Default::default()
            },
            Commands::Version | Commands::Config(_) => CliOverrides::default(),
        }
    }

    pub async fn run(self, config: AppConfig) -> Result<(), String> {
        match self {
            Commands::Version => print_version(),
            Commands::Serve { .. } => serve::run_serve(&config).await?,
            Commands::Dashboard { .. } => dashboard::run_dashboard_command(&config).await?,
            Commands::Indices {
                include_system,
                json,
                direct,
                ..
            } => {
                indices::run_indices(
                    &config,
                    indices::IndicesOptions {
                        include_system,
                        json,
                        direct,
                    },
                )
                .await?
            }
            Commands::Config(ConfigCommands::Show) => print_config(&config)?,
            Commands::Config(ConfigCommands::Sample) => print_sample_config(),
        }
        Ok(())
    }
}

pub fn print_version() {
    println!("lastsync v{}", env!("CARGO_PKG_VERSION"));
}

pub fn print_sample_config() {
    print!("{}", ConfigFile::sample());
}

fn print_config(config: &AppConfig) -> Result<(), String> {
    let rendered = toml::to_string_pretty(&config.redacted())
        .map_err(|e| format!("Failed to render configuration: {}", e))?;
    println!("# Resolved configuration");
    print!("{rendered}");
    Ok(())
}
