//! Configuration initialization and hierarchy management
//!
//! Precedence, lowest first: defaults, config file, environment, CLI flags.
//! Each layer is a `toml::Table`; the merged table is deserialized once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{default_config_path, load_config_file, AppConfig};
use crate::error::{DiscRipperError, DiscRipperResult};
use crate::utils::logging::LogFormat;
use crate::utils::path::resolve_against;

/// Environment variables and the config keys they set
pub const ENV_MAPPINGS: [(&str, &str); 4] = [
    ("DISCRIPPER_OUTPUT_DIRECTORY", "output_directory"),
    ("DISCRIPPER_LOG_LEVEL", "logging.level"),
    ("DISCRIPPER_DRY_RUN", "dry_run"),
    ("DISCRIPPER_COMPRESSION", "compression"),
];

/// Values supplied on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub output_directory: Option<String>,
    pub title: Option<String>,
    /// Flags only ever switch a setting on
    pub dry_run: bool,
    pub compression: bool,
    pub verbose: bool,
    pub log_format: Option<LogFormat>,
}

/// Resolve configuration from the real environment and working directory
pub fn initialize_configuration_hierarchy(overrides: &CliOverrides) -> DiscRipperResult<AppConfig> {
    let env: HashMap<String, String> = ENV_MAPPINGS
        .iter()
        .filter_map(|(name, _)| std::env::var(name).ok().map(|value| (name.to_string(), value)))
        .collect();
    let cwd = std::env::current_dir()?;
    resolve_configuration(overrides, &env, &cwd)
}

/// Merge every layer and validate the result
pub fn resolve_configuration(
    overrides: &CliOverrides,
    env: &HashMap<String, String>,
    cwd: &Path,
) -> DiscRipperResult<AppConfig> {
    let mut merged = default_layer()?;

    let config_path = overrides.config_path.clone().or_else(default_config_path);
    if let Some(path) = config_path {
        let path = resolve_against(&path.to_string_lossy(), cwd);
        deep_merge(&mut merged, load_config_file(&path)?);
    }

    deep_merge(&mut merged, environment_layer(env)?);
    deep_merge(&mut merged, cli_layer(overrides));

    let mut config: AppConfig = toml::Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| DiscRipperError::config(e.to_string()))?;

    config.output_directory = resolve_against(&config.output_directory.to_string_lossy(), cwd);
    config.validate()?;

    debug!(?config, "Configuration resolved");
    Ok(config)
}

fn default_layer() -> DiscRipperResult<toml::Table> {
    match toml::Value::try_from(AppConfig::default()) {
        Ok(toml::Value::Table(table)) => Ok(table),
        Ok(_) => Err(DiscRipperError::config("defaults did not serialize to a table")),
        Err(e) => Err(DiscRipperError::config(format!("cannot serialize defaults: {}", e))),
    }
}

/// Merge `overlay` into `base`; nested tables merge, everything else replaces
pub fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(nested) if base.get(&key).map_or(false, toml::Value::is_table) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    deep_merge(existing, nested);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Insert `value` at a dotted `key`, creating intermediate tables
fn set_dotted(table: &mut toml::Table, key: &str, value: toml::Value) {
    match key.split_once('.') {
        Some((head, rest)) => {
            let entry = table
                .entry(head.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            if !entry.is_table() {
                *entry = toml::Value::Table(toml::Table::new());
            }
            if let toml::Value::Table(nested) = entry {
                set_dotted(nested, rest, value);
            }
        }
        None => {
            table.insert(key.to_string(), value);
        }
    }
}

fn environment_layer(env: &HashMap<String, String>) -> DiscRipperResult<toml::Table> {
    let mut layer = toml::Table::new();
    for (name, key) in ENV_MAPPINGS {
        let Some(raw) = env.get(name) else { continue };
        let value = match key {
            "dry_run" | "compression" => toml::Value::Boolean(parse_bool(name, raw)?),
            _ => toml::Value::String(raw.trim().to_string()),
        };
        debug!(variable = name, key, "Environment override");
        set_dotted(&mut layer, key, value);
    }
    Ok(layer)
}

fn parse_bool(name: &str, raw: &str) -> DiscRipperResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(DiscRipperError::config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn cli_layer(overrides: &CliOverrides) -> toml::Table {
    let mut layer = toml::Table::new();
    if let Some(dir) = &overrides.output_directory {
        set_dotted(&mut layer, "output_directory", toml::Value::String(dir.clone()));
    }
    if let Some(title) = &overrides.title {
        set_dotted(&mut layer, "title", toml::Value::String(title.clone()));
    }
    if overrides.dry_run {
        set_dotted(&mut layer, "dry_run", toml::Value::Boolean(true));
    }
    if overrides.compression {
        set_dotted(&mut layer, "compression", toml::Value::Boolean(true));
    }
    if overrides.verbose {
        set_dotted(&mut layer, "logging.level", toml::Value::String("debug".to_string()));
    }
    if let Some(format) = overrides.log_format {
        set_dotted(&mut layer, "logging.format", toml::Value::String(format.as_str().to_string()));
    }
    layer
}
