use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the four fixed factor groupings.
///
/// Scores are summed per category and only combined in the method total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Geometry,
    OreZone,
    HangingWall,
    Footwall,
}

impl Category {
    /// All categories in scoring order.
    pub const ALL: [Category; 4] = [
        Category::Geometry,
        Category::OreZone,
        Category::HangingWall,
        Category::Footwall,
    ];

    /// Key used in catalog files (e.g. "ore_zone")
    pub fn key(&self) -> &'static str {
        match self {
            Category::Geometry => "geometry",
            Category::OreZone => "ore_zone",
            Category::HangingWall => "hanging_wall",
            Category::Footwall => "footwall",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Geometry => 0,
            Category::OreZone => 1,
            Category::HangingWall => 2,
            Category::Footwall => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Weights for one method: factor -> option -> weight.
pub type MethodWeights = BTreeMap<String, BTreeMap<String, i32>>;

/// Catalog document as it appears on disk.
///
/// Example YAML:
/// ```yaml
/// version: "1.0.0"
/// source: { excel_file: "...", excel_version: "...", reference_paper: "...", algorithm_source: "..." }
/// elimination_threshold: -49
/// methods: ["Open Pit"]
/// factors:
///   - { key: shape, label: "General Shape", category: geometry, tooltip: "...", options: ["Irregular"] }
/// categories:
///   - { key: geometry, label: "Geometry", factors: [shape] }
/// weights:
///   "Open Pit":
///     shape: { "Irregular": 3 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub version: String,
    pub source: SourceInfo,
    pub elimination_threshold: i32,
    pub methods: Vec<String>,
    pub factors: Vec<FactorConfig>,
    pub categories: Vec<CategoryConfig>,
    pub weights: BTreeMap<String, MethodWeights>,
}

/// Provenance of the weight table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SourceInfo {
    pub excel_file: String,
    pub excel_version: String,
    pub reference_paper: String,
    pub algorithm_source: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FactorConfig {
    pub key: String,
    pub label: String,
    pub category: Category,
    #[serde(default)]
    pub tooltip: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub key: Category,
    pub label: String,
    pub factors: Vec<String>,
}
