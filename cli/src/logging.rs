use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DASHBOARD_LOG_FILE: &str = "dashboard.log";

/// Where log lines go. The dashboard owns the terminal, so it logs to a file.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn default_filter(debug: bool, default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            format!(
                "error,{}=debug,lastsync_server=debug,lastsync_api=debug,lastsync_tui=debug",
                env!("CARGO_CRATE_NAME")
            )
            .into()
        } else {
            default_level.into()
        }
    })
}

/// Installs the global subscriber. The returned guard flushes the file
/// writer on drop and must be held until the process exits.
pub fn init_logging(
    target: LogTarget<'_>,
    debug: bool,
    default_level: &str,
) -> Option<WorkerGuard> {
    let filter = default_filter(debug, default_level);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .init();
            None
        }
        LogTarget::File(dir) => {
            // Without a writable log directory the dashboard runs without logs.
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(DASHBOARD_LOG_FILE)
                .build(dir)
                .ok()?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
            Some(guard)
        }
    }
}
