//! Catalog seed configuration loading from config.toml
//!
//! The menu board (categories, products, menus and their variants) can be described
//! in a TOML file and loaded into an empty database on first start. See
//! [`crate::core::seed::seed_catalog`].

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the location of the seed file.
pub const CONFIG_PATH_VAR: &str = "STORE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub menus: Vec<MenuConfig>,
    #[serde(default)]
    pub menu_variants: Vec<MenuVariantConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Configuration for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Names of the categories this product is listed under
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Configuration for a single menu
#[derive(Debug, Deserialize, Clone)]
pub struct MenuConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Configuration for a single menu variant
#[derive(Debug, Deserialize, Clone)]
pub struct MenuVariantConfig {
    pub size: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

/// Loads the catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load catalog configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Resolves the seed file path: `STORE_CONFIG` if set, `./config.toml` otherwise.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Loads the catalog configuration from [`config_path`], or `None` if the file is absent.
pub fn load_default_config() -> Result<Option<CatalogConfig>> {
    let path = config_path();
    if !Path::new(&path).exists() {
        return Ok(None);
    }
    load_config(path).map(Some)
}
