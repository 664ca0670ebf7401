//! Configuration
//!
//! Provides configuration management with:
//! - Config file loading (optional)
//! - Environment variable overrides
//! - Runtime defaults
//! - Validation
//!
//! The configuration is loaded once by the binary and handed down by reference.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MIN_CHART_SIZE: u32 = 200;
const MAX_CHART_SIZE: u32 = 8000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Chart rendering configuration
    pub chart: ChartConfig,

    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
            directory: PathBuf::from("logs"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logviz.db"),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: crate::report::FIGURE_TITLE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("logviz.toml"),
            PathBuf::from(".logviz.toml"),
            dirs::config_dir()
                .map(|d| d.join("logviz").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Ok(val) = env::var("LOGVIZ_LOG_DIR") {
            self.logging.directory = PathBuf::from(val);
        }

        if let Ok(val) = env::var("LOGVIZ_DATABASE") {
            self.database.path = PathBuf::from(val);
        }

        if let Ok(val) = env::var("LOGVIZ_CHART_WIDTH") {
            self.chart.width = val.parse().context("Invalid LOGVIZ_CHART_WIDTH")?;
        }
        if let Ok(val) = env::var("LOGVIZ_CHART_HEIGHT") {
            self.chart.height = val.parse().context("Invalid LOGVIZ_CHART_HEIGHT")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.chart.width), ("height", self.chart.height)] {
            if !(MIN_CHART_SIZE..=MAX_CHART_SIZE).contains(&value) {
                return Err(anyhow::anyhow!(
                    "Chart {} must be between {} and {} pixels, got {}",
                    name,
                    MIN_CHART_SIZE,
                    MAX_CHART_SIZE,
                    value
                ));
            }
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Log format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            ));
        }

        if !matches!(self.logging.output.as_str(), "console" | "file" | "both") {
            return Err(anyhow::anyhow!(
                "Log output must be \"console\", \"file\" or \"both\", got {:?}",
                self.logging.output
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Database path cannot be empty"));
        }

        Ok(())
    }

    /// Report where the configuration came from. Call once logging is initialised.
    pub fn log_loaded(&self) {
        match &self.source {
            Some(path) => info!(config_file = %path.display(), "Loaded configuration from file"),
            None => debug!("No configuration file found, using defaults"),
        }
        if self.chart.title.trim().is_empty() {
            warn!("Chart title is empty");
        }
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "WARN");
        assert_eq!(config.database.path, PathBuf::from("logviz.db"));
        assert_eq!(config.chart.width, 1000);
        assert_eq!(config.chart.height, 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        env::set_var("LOGVIZ_CHART_WIDTH", "1280");
        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.chart.width, 1280);
        env::remove_var("LOGVIZ_CHART_WIDTH");
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.chart.height = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_is_recorded_not_saved() {
        assert_eq!(Config::default().source, None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logviz.toml");
        fs::write(&path, "[chart]\nwidth = 640\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.chart.width, 640);

        let saved = dir.path().join("saved.toml");
        config.save_to_file(&saved).unwrap();
        assert!(!fs::read_to_string(&saved).unwrap().contains("source"));
    }
}
