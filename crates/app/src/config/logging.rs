//! Logging Config
//!
//! Logs always go to stderr so command output on stdout stays parseable.

use clap::Args;
use tracing_subscriber::EnvFilter;

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, for terminals
    #[default]
    Compact,

    /// One JSON object per event, for log shippers
    Json,
}

/// Logging settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log filter, a level or an `EnvFilter` directive such as `masala_app=debug`
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "warn",
        value_parser = parse_log_level,
        global = true
    )]
    pub log_level: String,

    /// Log line format
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

/// Accept a level or filter directive only if `EnvFilter` can build it.
fn parse_log_level(raw: &str) -> Result<String, String> {
    EnvFilter::try_new(raw)
        .map(|_filter| raw.to_string())
        .map_err(|error| format!("invalid log filter {raw:?}: {error}"))
}
