//! Product catalog loading from config.toml
//!
//! The catalog file lists the products seeded into an empty database on first
//! run. A copy of the default catalog is compiled into the binary so a missing
//! file never blocks startup.

use crate::errors::{Error, Result};
use crate::models::Unit;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const BUILTIN_CATALOG: &str = include_str!("../../config.toml");

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Products to seed
    pub products: Vec<ProductSeed>,
}

/// One seed product, macros per 100 g/ml
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Display name
    pub name: String,
    /// Energy per 100
    pub kcal_per_100: f64,
    /// Protein per 100
    pub protein_per_100: f64,
    /// Fat per 100
    pub fat_per_100: f64,
    /// Carbs per 100
    pub carbs_per_100: f64,
    /// Simple carbs per 100
    pub simple_carbs_per_100: f64,
    /// Unit the product is normally counted in
    pub default_unit: Unit,
    /// Weight of one piece, for piece-based products
    #[serde(default)]
    pub piece_weight_grams: Option<f64>,
}

/// Parses a catalog from TOML text.
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog TOML: {e}"),
    })
}

/// Loads the catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;
    parse_catalog(&contents)
}

/// The catalog compiled into the crate.
pub fn builtin_catalog() -> Result<CatalogConfig> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Loads the catalog from `CATALOG_PATH` (default `config.toml`), falling back to the
/// built-in catalog when the file does not exist.
pub fn load_default_catalog() -> Result<CatalogConfig> {
    let path = std::env::var("CATALOG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        debug!("Loading product catalog from {}", path);
        load_catalog(&path)
    } else {
        warn!("Catalog file {} not found, using built-in catalog", path);
        builtin_catalog()
    }
}
