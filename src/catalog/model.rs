use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::schema::{CatalogFile, Category, MethodWeights, SourceInfo};
use super::validation::validate_catalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("invalid catalog:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

/// An input dimension of the deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub key: String,
    pub label: String,
    pub category: Category,
    pub tooltip: String,
    pub options: Vec<String>,
}

impl Factor {
    pub fn accepts(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub label: String,
    pub factors: Vec<String>,
}

/// Validated, read-only weight catalog.
///
/// Built once at startup and shared by reference. Every accessor is a pure
/// read; nothing in the crate mutates a `Catalog` after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    version: String,
    source: SourceInfo,
    elimination_threshold: i32,
    methods: Vec<String>,
    factors: Vec<Factor>,
    categories: Vec<CategoryInfo>,
    weights: BTreeMap<String, MethodWeights>,
}

impl Catalog {
    /// Parse and validate a YAML catalog document.
    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_saphyr::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    /// The UBC Mining Method Selector catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(super::BUILTIN_CATALOG)
    }

    /// Validate a parsed catalog document and freeze it.
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        validate_catalog(&file).map_err(CatalogError::Invalid)?;

        let factors = file
            .factors
            .into_iter()
            .map(|f| Factor {
                key: f.key,
                label: f.label,
                category: f.category,
                tooltip: f.tooltip,
                options: f.options,
            })
            .collect();

        // Validation guarantees exactly one entry per category
        let mut categories: Vec<CategoryInfo> = file
            .categories
            .into_iter()
            .map(|c| CategoryInfo {
                category: c.key,
                label: c.label,
                factors: c.factors,
            })
            .collect();
        categories.sort_by_key(|c| c.category.index());

        Ok(Self {
            version: file.version,
            source: file.source,
            elimination_threshold: file.elimination_threshold,
            methods: file.methods,
            factors,
            categories,
            weights: file.weights,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn elimination_threshold(&self) -> i32 {
        self.elimination_threshold
    }

    /// Method names in catalog order
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    /// Case-insensitive method lookup, returning the catalog spelling.
    pub fn find_method(&self, name: &str) -> Option<&str> {
        self.methods
            .iter()
            .find(|m| m.eq_ignore_ascii_case(name.trim()))
            .map(String::as_str)
    }

    /// Factors in declaration order
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn factor(&self, key: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.key == key)
    }

    /// Categories in scoring order (geometry, ore zone, hanging wall, footwall)
    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    pub fn category(&self, category: Category) -> &CategoryInfo {
        &self.categories[category.index()]
    }

    /// Full weight table of one method, for display.
    pub fn method_weights(&self, method: &str) -> Option<&MethodWeights> {
        self.weights.get(method)
    }

    /// Weight of `option` for `factor` under `method`.
    ///
    /// Unknown methods, factors and options score a neutral 0 rather than
    /// failing; the catalog is trusted, so a miss can only be a caller bug.
    pub fn weight(&self, method: &str, factor: &str, option: &str) -> i32 {
        match self
            .weights
            .get(method)
            .and_then(|table| table.get(factor))
            .and_then(|options| options.get(option))
        {
            Some(weight) => *weight,
            None => 0,
        }
    }

    /// True if `weight` disqualifies a method on its own.
    pub fn is_eliminating(&self, weight: i32) -> bool {
        weight <= self.elimination_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_shape() {
        let catalog = builtin();
        assert_eq!(catalog.methods().len(), 10);
        assert_eq!(catalog.factors().len(), 11);
        assert_eq!(catalog.elimination_threshold(), -49);
        assert!(!catalog.version().is_empty());
        assert!(catalog.source().reference_paper.contains("Nicholas"));
    }

    #[test]
    fn test_weight_lookup() {
        let catalog = builtin();
        assert_eq!(catalog.weight("Open Pit", "shape", "Equidimensional"), 4);
        assert_eq!(catalog.weight("Block Caving", "thickness", "V. Narrow"), -49);
    }

    #[test]
    fn test_unknown_method_weighs_zero() {
        let catalog = builtin();
        assert_eq!(catalog.weight("Non-existent Method", "shape", "Equidimensional"), 0);
    }

    #[test]
    fn test_unknown_factor_weighs_zero() {
        let catalog = builtin();
        assert_eq!(catalog.weight("Open Pit", "non_existent", "value"), 0);
    }

    #[test]
    fn test_unknown_option_weighs_zero() {
        let catalog = builtin();
        assert_eq!(catalog.weight("Open Pit", "shape", "Toroidal"), 0);
    }

    #[test]
    fn test_is_eliminating() {
        let catalog = builtin();
        assert!(catalog.is_eliminating(-49));
        assert!(catalog.is_eliminating(-50));
        assert!(!catalog.is_eliminating(-48));
        assert!(!catalog.is_eliminating(0));
        assert!(!catalog.is_eliminating(4));
    }

    #[test]
    fn test_categories_in_scoring_order() {
        let catalog = builtin();
        let order: Vec<Category> = catalog.categories().iter().map(|c| c.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert_eq!(
            catalog.category(Category::Geometry).factors,
            vec!["shape", "thickness", "plunge", "grade", "depth"]
        );
        assert_eq!(catalog.category(Category::Footwall).factors, vec!["rmr_fw", "rss_fw"]);
    }

    #[test]
    fn test_find_method_ignores_case() {
        let catalog = builtin();
        assert_eq!(catalog.find_method("open pit"), Some("Open Pit"));
        assert_eq!(catalog.find_method("  LONGWALL "), Some("Longwall"));
        assert_eq!(catalog.find_method("Glory Hole"), None);
    }

    #[test]
    fn test_factor_accepts_only_declared_options() {
        let catalog = builtin();
        let depth = catalog.factor("depth").unwrap();
        assert!(depth.accepts("100-600m"));
        assert!(!depth.accepts("100-600 m"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let result = Catalog::from_yaml("methods: [unterminated");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_invalid_catalog_lists_every_problem() {
        let yaml = TINY_CATALOG_TEMPLATE.replace("@@", "12");
        match Catalog::from_yaml(&yaml) {
            Err(CatalogError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("elimination_threshold"));
            }
            other => panic!("expected invalid catalog, got {:?}", other.map(|_| ())),
        }
    }

    const TINY_CATALOG_TEMPLATE: &str = r#"
version: "test"
source: { excel_file: "t", excel_version: "t", reference_paper: "t", algorithm_source: "t" }
elimination_threshold: @@
methods: ["A"]
factors:
  - { key: f1, label: "F1", category: geometry, options: ["x"] }
  - { key: f2, label: "F2", category: ore_zone, options: ["x"] }
  - { key: f3, label: "F3", category: hanging_wall, options: ["x"] }
  - { key: f4, label: "F4", category: footwall, options: ["x"] }
categories:
  - { key: geometry, label: "G", factors: [f1] }
  - { key: ore_zone, label: "O", factors: [f2] }
  - { key: hanging_wall, label: "H", factors: [f3] }
  - { key: footwall, label: "F", factors: [f4] }
weights:
  "A": { f1: { "x": 1 } }
"#;
}
