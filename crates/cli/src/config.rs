//! CLI configuration module

use cinelog_core::config::CinelogConfig;
use cinelog_core::{CinelogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI-specific configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default output format
    pub default_output_format: OutputFormat,
    /// Whether to use colors in output
    pub use_colors: bool,
    /// Cinelog configuration file used when `--config` is not given
    pub default_config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Pretty,
            use_colors: true,
            default_config_path: None,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Pretty,
    Compact,
    Table,
}

impl OutputFormat {
    /// Machine-readable formats print the serialized value and nothing else
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml | Self::Compact)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CinelogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "table" => Ok(Self::Table),
            _ => Err(CinelogError::validation(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

/// CLI configuration manager
#[derive(Debug, Default)]
pub struct ConfigManager {
    cli_config: CliConfig,
    cinelog_config: Option<CinelogConfig>,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Load CLI configuration from file
    pub fn load_cli_config<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = std::fs::read_to_string(path)?;

        // Try YAML first, then JSON
        self.cli_config = match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(_) => serde_json::from_str(&content)?,
        };

        Ok(())
    }

    /// Save CLI configuration to file
    pub fn save_cli_config<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self.cli_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the layered Cinelog configuration
    ///
    /// `path` falls back to the CLI config's `default_config_path`; with
    /// neither, only defaults and environment overrides apply.
    pub fn load_cinelog_config(&mut self, path: Option<&Path>) -> Result<&CinelogConfig> {
        let path = path.or(self.cli_config.default_config_path.as_deref());
        let config = CinelogConfig::load(path)?;
        Ok(self.cinelog_config.insert(config))
    }

    /// Get CLI configuration
    pub fn cli_config(&self) -> &CliConfig {
        &self.cli_config
    }

    /// Get Cinelog configuration
    pub fn cinelog_config(&self) -> Option<&CinelogConfig> {
        self.cinelog_config.as_ref()
    }

    /// Get or create Cinelog configuration
    pub fn cinelog_config_or_default(&self) -> CinelogConfig {
        self.cinelog_config.clone().unwrap_or_default()
    }

    /// Set CLI configuration
    pub fn set_cli_config(&mut self, config: CliConfig) {
        self.cli_config = config;
    }

    /// Get the default CLI config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        match dirs::config_dir() {
            Some(dir) => Ok(dir.join("cinelog")),
            None => Ok(std::env::current_dir()?.join(".cinelog")),
        }
    }

    /// Get the default CLI config file path
    pub fn default_cli_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("cli-config.yaml"))
    }

    /// Load the CLI config from the default location if one exists there
    pub fn load_default_cli_config(&mut self) -> Result<()> {
        let path = Self::default_cli_config_path()?;
        if path.exists() {
            self.load_cli_config(&path)?;
            tracing::debug!("Loaded CLI configuration from {:?}", path);
        }
        Ok(())
    }

    /// Merge CLI arguments with configuration
    pub fn merge_with_args(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(output_format) = &args.output_format {
            self.cli_config.default_output_format = output_format.parse()?;
        }

        if let Some(use_colors) = args.use_colors {
            self.cli_config.use_colors = use_colors;
        }

        if let Some(config_file) = &args.config_file {
            self.cli_config.default_config_path = Some(config_file.clone());
        }

        Ok(())
    }
}

/// CLI arguments that can override configuration
#[derive(Debug, Default)]
pub struct CliArgs {
    pub output_format: Option<String>,
    pub use_colors: Option<bool>,
    pub config_file: Option<PathBuf>,
}

/// Check if output supports colors
pub fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    atty::is(atty::Stream::Stdout)
}
