//! Application configuration for biocatalog.
//!
//! User config lives at `~/.biocatalog/biocatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::SourceKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "biocatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".biocatalog";

// ---------------------------------------------------------------------------
// Config structs (matching biocatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Source column names.
    #[serde(default)]
    pub columns: ColumnMap,

    /// Registered tabular sources.
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path of the durable catalog document.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Custom rule table. The embedded table is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            rules_path: None,
        }
    }
}

fn default_catalog_path() -> String {
    "databases_processed.json".into()
}

/// `[columns]` section: header names of the three fields a source must expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "default_name_column")]
    pub name: String,

    #[serde(default = "default_url_column")]
    pub url: String,

    #[serde(default = "default_description_column")]
    pub short_description: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            url: default_url_column(),
            short_description: default_description_column(),
        }
    }
}

fn default_name_column() -> String {
    "Database name".into()
}
fn default_url_column() -> String {
    "URL".into()
}
fn default_description_column() -> String {
    "Short description".into()
}

/// `[[sources]]` entry, a named tabular release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Name used on the command line.
    pub name: String,
    /// Path to the spreadsheet or delimited file.
    pub path: String,
    /// Release kind.
    #[serde(default)]
    pub kind: SourceKind,
    /// Worksheet to read (first sheet when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// 1-based inclusive data-row window, e.g. `"92-187"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<String>,
}

impl AppConfig {
    /// Look up a registered source by name.
    pub fn find_source(&self, name: &str) -> Option<&SourceEntry> {
        self.sources.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.biocatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.biocatalog/biocatalog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        CatalogError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_sources(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Registered source names must be unique and non-empty.
fn validate_sources(config: &AppConfig) -> Result<()> {
    for (i, source) in config.sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(CatalogError::config(format!("sources[{i}] has an empty name")));
        }
        if config.sources[..i].iter().any(|s| s.name == source.name) {
            return Err(CatalogError::config(format!(
                "source '{}' is registered more than once",
                source.name
            )));
        }
    }
    Ok(())
}
