//! Configuration types for the Cinelog core library
//!
//! Settings are layered: built-in defaults, then an optional YAML or JSON
//! file, then `CINELOG__*` environment variables
//! (e.g. `CINELOG__LOG_STORE__URL`).

use crate::{CinelogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "CINELOG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CinelogConfig {
    /// Where search events are written
    #[serde(default)]
    pub log_store: LogStoreConfig,
    /// The searchable film catalog
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Statistics settings
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStoreBackend {
    /// Events live in process memory and vanish on exit
    #[default]
    Memory,
    Postgres,
}

/// Log store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogStoreConfig {
    #[serde(default)]
    pub backend: LogStoreBackend,
    /// Connection URL, required for `postgres`
    #[serde(default)]
    pub url: Option<String>,
    /// Table holding search events
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            backend: LogStoreBackend::default(),
            url: None,
            table: default_table(),
            max_connections: default_max_connections(),
        }
    }
}

/// Catalog backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// In-memory catalog from a fixture file, or the built-in sample
    #[default]
    Fixture,
    Mysql,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: CatalogBackend,
    /// Connection URL, required for `mysql`
    #[serde(default)]
    pub url: Option<String>,
    /// Fixture file; the built-in sample catalog is used when unset
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
    /// Rows per page of a title search
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Row cap for the unpaginated searches
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::default(),
            url: None,
            fixture_path: None,
            page_size: default_page_size(),
            result_limit: default_result_limit(),
            max_connections: default_max_connections(),
        }
    }
}

/// Analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// Rows per statistics view when no limit is given
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Log every recorded event and snapshot read
    #[serde(default)]
    pub debug: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            debug: false,
        }
    }
}

/// Log line layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human readable
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON objects
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = CinelogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(CinelogError::validation(format!(
                "Unknown log format '{}', expected pretty, compact or json",
                s
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl CinelogConfig {
    /// Load layered configuration
    ///
    /// A missing `path` is not an error; defaults and environment still
    /// apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&CinelogConfig::default())?);

        if let Some(path) = path {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: CinelogConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        // Try YAML first, then JSON
        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = serde_json::from_str(&content)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_store.backend == LogStoreBackend::Postgres && self.log_store.url.is_none() {
            return Err(CinelogError::validation(
                "log_store.url is required for the postgres backend",
            ));
        }

        if !is_identifier(&self.log_store.table) {
            return Err(CinelogError::validation(format!(
                "log_store.table '{}' must be a plain SQL identifier",
                self.log_store.table
            )));
        }

        if is_reserved_word(&self.log_store.table) {
            return Err(CinelogError::validation(format!(
                "log_store.table '{}' is a reserved SQL word",
                self.log_store.table
            )));
        }

        if self.catalog.backend == CatalogBackend::Mysql && self.catalog.url.is_none() {
            return Err(CinelogError::validation(
                "catalog.url is required for the mysql backend",
            ));
        }

        if self.catalog.page_size == 0 {
            return Err(CinelogError::validation("catalog.page_size must be at least 1"));
        }

        if self.analytics.default_limit == 0 {
            return Err(CinelogError::validation(
                "analytics.default_limit must be at least 1",
            ));
        }

        if self.log_store.max_connections == 0 || self.catalog.max_connections == 0 {
            return Err(CinelogError::validation("max_connections must be at least 1"));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(CinelogError::validation(format!(
                "logging.level '{}' is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        Ok(())
    }
}

/// Longest identifier PostgreSQL keeps without truncating
const MAX_IDENTIFIER_LEN: usize = 63;

/// Keywords PostgreSQL refuses as bare table names
const RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant", "group",
    "having", "ilike", "in", "initially", "inner", "intersect", "into", "is", "isnull",
    "join", "lateral", "leading", "left", "like", "limit", "localtime", "localtimestamp",
    "natural", "not", "notnull", "null", "offset", "on", "only", "or", "order", "outer",
    "overlaps", "placing", "primary", "references", "returning", "right", "select",
    "session_user", "similar", "some", "symmetric", "system_user", "table", "tablesample",
    "then", "to", "trailing", "true", "union", "unique", "user", "using", "variadic",
    "verbose", "when", "where", "window", "with",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    name.len() <= MAX_IDENTIFIER_LEN
        && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_reserved_word(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}

// Default value functions
fn default_table() -> String {
    "search_events".to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_page_size() -> usize {
    10
}
fn default_result_limit() -> usize {
    1000
}
fn default_limit() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
