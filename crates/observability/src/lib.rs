//! Process-wide tracing setup shared by every binary.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Output format of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_VAR: &str = "AGROFIERROS_LOG_FORMAT";

/// Format named by an optional setting; unset or unknown falls back to JSON.
fn format_from(value: Option<&str>) -> (LogFormat, Option<String>) {
    match value.map(str::parse::<LogFormat>) {
        None => (LogFormat::default(), None),
        Some(Ok(format)) => (format, None),
        Some(Err(err)) => (LogFormat::default(), Some(err)),
    }
}

/// Initialize tracing with the format named by `AGROFIERROS_LOG_FORMAT`.
pub fn init_from_env() {
    let value = std::env::var(LOG_FORMAT_VAR).ok();
    let (format, rejected) = format_from(value.as_deref());
    init_with(format);
    if let Some(reason) = rejected {
        tracing::warn!(var = LOG_FORMAT_VAR, %reason, "falling back to json logs");
    }
}

/// Initialize tracing with JSON output, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(LogFormat::Json);
}

pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
