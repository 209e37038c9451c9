mod model;
mod schema;
mod validation;

pub use model::{Catalog, CatalogError, CategoryInfo, Factor};
pub use schema::{CatalogFile, Category, CategoryConfig, FactorConfig, MethodWeights, SourceInfo};
pub use validation::validate_catalog;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// UBC Mining Method Selector weights, embedded at build time.
pub const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.yaml");

/// Load the weight catalog.
///
/// # Arguments
///
/// * `path` - Optional path to an alternate catalog file. If None, uses the built-in catalog.
///
/// # Errors
///
/// Returns an error if:
/// - The catalog file does not exist or cannot be read
/// - The YAML cannot be parsed
/// - The catalog fails validation
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        None => Catalog::builtin().context("Built-in catalog is invalid")?,
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Catalog file not found at {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;
            Catalog::from_yaml(&content)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?
        }
    };

    tracing::debug!(
        version = catalog.version(),
        methods = catalog.methods().len(),
        factors = catalog.factors().len(),
        "catalog loaded"
    );

    Ok(catalog)
}
