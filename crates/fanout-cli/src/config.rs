//! Configuration file management for fanout.
//!
//! Provides a TOML-based config file at `~/.config/fanout/config.toml` and
//! a resolution chain for the spec catalog source:
//! CLI flag > env var > config file > embedded library.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fanout_store::SpecCatalog;

/// Env var pointing at a spec library TOML file.
pub const CATALOG_ENV_VAR: &str = "FANOUT_SPEC_CATALOG";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub catalog: CatalogSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Path to a spec library TOML file; `None` means the embedded library.
    pub path: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the fanout config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fanout` or `~/.config/fanout`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fanout");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fanout")
}

/// Return the path to the fanout config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Catalog resolution
// -----------------------------------------------------------------------

/// Resolve the active spec catalog.
///
/// Chain: `--catalog` flag > `FANOUT_SPEC_CATALOG` env var > config file
/// `catalog.path` > embedded library. A missing config file is fine; a
/// configured path that fails to load is an error.
pub fn resolve_catalog(cli_path: Option<&str>) -> Result<SpecCatalog> {
    if let Some(path) = cli_path {
        return SpecCatalog::from_path(Path::new(path));
    }

    if let Ok(path) = std::env::var(CATALOG_ENV_VAR) {
        return SpecCatalog::from_path(Path::new(&path));
    }

    if let Ok(config) = load_config() {
        if let Some(path) = config.catalog.path {
            return SpecCatalog::from_path(Path::new(&path));
        }
    }

    Ok(SpecCatalog::embedded())
}

/// Resolve the file path of the active spec catalog, if it is file-backed.
///
/// Same chain as [`resolve_catalog`] without the embedded fallback: `None`
/// means the active catalog is the embedded library.
pub fn resolve_catalog_path(cli_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var(CATALOG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    if let Ok(config) = load_config() {
        if let Some(path) = config.catalog.path {
            return Some(PathBuf::from(path));
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
