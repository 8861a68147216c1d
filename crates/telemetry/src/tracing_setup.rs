//! Structured logging setup.
//!
//! `RUST_LOG` wins over the configured filter. `LOG_FORMAT=json` (or the older
//! `LOG_JSON=1`) switches to one JSON object per line for log shippers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: our crates at info, noisy HTTP internals at warn.
pub const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "1" | "true" => Some(Self::Json),
            "pretty" | "text" | "0" | "false" => Some(Self::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TracingConfig {
    /// Reads `RUST_LOG`, `LOG_FORMAT` and `LOG_JSON`.
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::parse(&v))
            .or_else(|| std::env::var("LOG_JSON").ok().and_then(|v| LogFormat::parse(&v)))
            .unwrap_or_default();

        Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            format,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Installs the global subscriber. Returns `false` if one was already set,
/// so tests can call this freely.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    if installed.is_ok() {
        tracing::info!(filter = %config.filter, format = ?config.format, "Logging initialized");
    }
    installed.is_ok()
}

pub fn init_tracing_from_env() -> bool {
    init_tracing(&TracingConfig::from_env())
}
