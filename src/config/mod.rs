//! Configuration model, file loading and validation
//!
//! The resolved [`AppConfig`] is produced by
//! [`crate::config_initialization`], which merges the default, file,
//! environment and command-line layers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::rules::ClassificationThresholds;
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::naming::{EpisodeTitleStrategy, NamingConfig};
use crate::utils::logging::{normalize_level, LogFormat};
use crate::utils::path::home_dir;

/// Default config file name under `~/.config`
pub const CONFIG_FILE_STEM: &str = "discripper";

/// Fully resolved application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory for ripped output
    pub output_directory: PathBuf,
    /// Name override for the movie or series
    #[serde(default)]
    pub title: Option<String>,
    /// Log a HandBrake compression plan for each output
    pub compression: bool,
    pub dry_run: bool,
    pub classification: ClassificationThresholds,
    pub naming: NamingSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingSection {
    /// `_` or `-`
    pub separator: String,
    pub lowercase: bool,
    /// `label`, `episode-number` or `custom:<name>`
    pub episode_title_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            title: None,
            compression: false,
            dry_run: false,
            classification: ClassificationThresholds::default(),
            naming: NamingSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for NamingSection {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            lowercase: false,
            episode_title_strategy: "label".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Check every value the core relies on
    pub fn validate(&self) -> DiscRipperResult<()> {
        self.classification
            .validate()
            .map_err(|e| DiscRipperError::config(format!("classification: {}", e)))?;

        if !matches!(self.naming.separator.as_str(), "_" | "-") {
            return Err(DiscRipperError::config(format!(
                "naming.separator must be '_' or '-', got '{}'",
                self.naming.separator
            )));
        }

        self.episode_title_strategy()?;

        if normalize_level(&self.logging.level).is_none() {
            return Err(DiscRipperError::config(format!(
                "logging.level must be one of trace, debug, info, warn, error; got '{}'",
                self.logging.level
            )));
        }

        if self.output_directory.as_os_str().is_empty() {
            return Err(DiscRipperError::config("output_directory must not be empty"));
        }

        Ok(())
    }

    pub fn episode_title_strategy(&self) -> DiscRipperResult<EpisodeTitleStrategy> {
        EpisodeTitleStrategy::parse(&self.naming.episode_title_strategy)
            .map_err(|e| DiscRipperError::config(format!("naming: {}", e)))
    }

    /// Naming preferences for the planner
    pub fn to_naming_config(&self) -> DiscRipperResult<NamingConfig> {
        Ok(NamingConfig::new(self.output_directory.clone())
            .with_separator(&self.naming.separator)
            .with_lowercase(self.naming.lowercase)
            .with_strategy(self.episode_title_strategy()?))
    }

    /// Level after normalization, `info` if unknown
    pub fn log_level(&self) -> &'static str {
        normalize_level(&self.logging.level).unwrap_or("info")
    }
}

/// `$HOME/Videos`, or `Videos` when no home directory is known
pub fn default_output_directory() -> PathBuf {
    home_dir()
        .map(|home| home.join("Videos"))
        .unwrap_or_else(|| PathBuf::from("Videos"))
}

/// `~/.config/discripper.toml`, else the `.yaml` sibling when only that exists
pub fn default_config_path() -> Option<PathBuf> {
    let config_dir = home_dir()?.join(".config");
    let toml_path = config_dir.join(format!("{}.toml", CONFIG_FILE_STEM));
    if toml_path.exists() {
        return Some(toml_path);
    }
    let yaml_path = config_dir.join(format!("{}.yaml", CONFIG_FILE_STEM));
    if yaml_path.exists() {
        return Some(yaml_path);
    }
    Some(toml_path)
}

/// Read a TOML or YAML config file into a table.
///
/// Missing and blank files yield an empty table.
pub fn load_config_file(path: &Path) -> DiscRipperResult<toml::Table> {
    if !path.exists() {
        debug!(path = %path.display(), "No configuration file");
        return Ok(toml::Table::new());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        DiscRipperError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    if content.trim().is_empty() {
        return Ok(toml::Table::new());
    }

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let table = if is_yaml {
        parse_yaml(&content, path)?
    } else {
        content.parse::<toml::Table>().map_err(|e| {
            DiscRipperError::config(format!("{} is not valid TOML: {}", path.display(), e))
        })?
    };

    debug!(path = %path.display(), keys = table.len(), "Loaded configuration file");
    Ok(table)
}

fn parse_yaml(content: &str, path: &Path) -> DiscRipperResult<toml::Table> {
    let invalid = |message: String| DiscRipperError::config(format!("{}: {}", path.display(), message));

    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| invalid(format!("not valid YAML: {}", e)))?;

    match document {
        serde_yaml::Value::Null => Ok(toml::Table::new()),
        serde_yaml::Value::Mapping(_) => toml::Table::deserialize(document)
            .map_err(|e| invalid(format!("unsupported value: {}", e))),
        _ => Err(invalid("top level must be a mapping".to_string())),
    }
}
