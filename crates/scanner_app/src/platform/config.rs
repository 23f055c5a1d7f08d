use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use scanner_link::{LinkSettings, DEFAULT_SERVICE_PATH};

use super::logging::LogDestination;

/// Terminal client for a document scan service.
#[derive(Debug, Clone, Parser)]
#[command(name = "scanner", version)]
pub struct ClientConfig {
    /// Origin of the scan service, e.g. `localhost:8090` or `https://scanner.lan`.
    #[arg(long, default_value = "localhost:8090")]
    pub origin: String,

    /// Socket path on the scan service.
    #[arg(long, default_value = DEFAULT_SERVICE_PATH)]
    pub path: String,

    /// How often the job list is redrawn, in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub flush_interval_ms: u64,

    /// Only reconnect when a request is sent, not as soon as the connection drops.
    #[arg(long)]
    pub no_reconnect_on_close: bool,

    /// Seconds to wait for the socket handshake.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Where log lines go.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ClientConfig {
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            reconnect_on_close: !self.no_reconnect_on_close,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(1))
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
