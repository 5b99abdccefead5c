use std::fmt;

use tracing_subscriber::EnvFilter;

/// Whether verbose diagnostics are on when nothing overrides it.
///
/// Debug builds log verbosely, release builds only log lifecycle and errors.
pub const fn debug_enabled_by_default() -> bool {
    cfg!(debug_assertions)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG` and `debug`.
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: debug_enabled_by_default(),
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn with_debug(debug: bool) -> Self {
        Self {
            debug,
            ..Self::default()
        }
    }

    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &str {
        match &self.filter {
            Some(filter) => filter.as_str(),
            None if self.debug => "debug",
            None => "info",
        }
    }
}

#[derive(Debug)]
pub enum LoggingError {
    Filter(String),
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::Filter(e) => write!(f, "invalid log filter: {e}"),
            LoggingError::AlreadyInitialized(e) => {
                write!(f, "logging already initialized: {e}")
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Installs the global `tracing` subscriber.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = match (&config.filter, std::env::var("RUST_LOG")) {
        (None, Ok(env)) if !env.trim().is_empty() => EnvFilter::try_new(env),
        _ => EnvFilter::try_new(config.default_directive()),
    }
    .map_err(|e| LoggingError::Filter(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
