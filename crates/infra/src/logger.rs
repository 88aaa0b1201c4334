//! Logging infrastructure for Cinelog
//!
//! Centralized `tracing` subscriber setup shared by the binary and tests.

use cinelog_core::config::{LogFormat, LoggingConfig};
use cinelog_core::{CinelogError, Result};
use std::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Line layout
    pub format: LogFormat,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include file/line information
    pub with_file_info: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_timestamps: true,
            with_file_info: false,
        }
    }
}

impl LoggerConfig {
    /// Level and format from the `logging` section of the configuration
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            level: logging.level.clone(),
            format: logging.format,
            ..Default::default()
        }
    }

    /// Apply `CINELOG_LOG_*` environment variables on top
    ///
    /// `CINELOG_LOG_FORMAT` must name a known format.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(level) = std::env::var("CINELOG_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = std::env::var("CINELOG_LOG_FORMAT") {
            self.format = format.parse()?;
        }
        self.with_timestamps = env_flag("CINELOG_LOG_TIMESTAMPS", self.with_timestamps);
        self.with_file_info = env_flag("CINELOG_LOG_FILE_INFO", self.with_file_info);
        Ok(self)
    }
}

/// Noisy dependencies held at `warn` regardless of the chosen level
const QUIET_TARGETS: [&str; 2] = ["sqlx=warn", "tokio_postgres=warn"];

/// Initialize the global logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<()> {
    let level = LogLevel::parse(&config.level)?;

    let mut env_filter = EnvFilter::from_default_env().add_directive(level.into());
    for target in QUIET_TARGETS {
        let directive: Directive = target
            .parse()
            .map_err(|e| CinelogError::validation(format!("Bad log directive '{}': {}", target, e)))?;
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(&config))
        .try_init()
        .map_err(|e| CinelogError::validation(format!("Failed to initialize logger: {}", e)))?;

    tracing::debug!(
        "Logger initialized with level: {}, format: {}",
        config.level,
        config.format
    );
    Ok(())
}

/// Output layer for the configured format, always writing to stderr
fn fmt_layer<S>(config: &LoggerConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_file(config.with_file_info)
        .with_line_number(config.with_file_info);

    match config.format {
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Pretty => {
            let layer = layer.pretty().with_span_events(FmtSpan::CLOSE);
            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Compact => {
            let layer = layer.compact();
            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Initialize logger for testing (reduces noise)
pub fn init_test_logger() -> Result<()> {
    let config = LoggerConfig {
        level: "warn".to_string(),
        format: LogFormat::Compact,
        with_timestamps: false,
        with_file_info: false,
    };

    // Ignore errors if already initialized
    let _ = init_logger(config);
    Ok(())
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.parse().unwrap_or(default))
        .unwrap_or(default)
}

/// Log level utilities
pub struct LogLevel;

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level: &str) -> Result<Level> {
        Level::from_str(level)
            .map_err(|e| CinelogError::validation(format!("Invalid log level '{}': {}", level, e)))
    }

    /// Get all available log levels
    pub fn all_levels() -> Vec<&'static str> {
        vec!["trace", "debug", "info", "warn", "error"]
    }

    /// Check if a log level string is valid
    pub fn is_valid(level: &str) -> bool {
        Self::all_levels().contains(&level.to_lowercase().as_str())
    }
}
