//! Underground mining method selection.
//!
//! Scores a fixed catalog of mining methods against deposit characteristics
//! using the UBC Mining Method Selector weights (Nicholas, 1981), flags
//! methods with a disqualifying weight, and ranks the rest.
//!
//! ```
//! use method_selector::{calculate_scores, validate_inputs, Catalog, InputRecord};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let inputs = InputRecord::from_assignments(&[
//!     "shape=Equidimensional", "thickness=V. Thick", "plunge=Flat",
//!     "grade=Moderate", "depth=<100m", "rmr_ore=Strong", "rss_ore=Strong",
//!     "rmr_hw=Strong", "rss_hw=Strong", "rmr_fw=Strong", "rss_fw=Strong",
//! ]).unwrap();
//! assert!(validate_inputs(&catalog, &inputs).is_valid());
//!
//! let result = calculate_scores(&catalog, &inputs);
//! assert_eq!(result.recommended_methods[0].method, "Open Pit");
//! ```

pub mod catalog;
pub mod config;
pub mod output;
pub mod scoring;
pub mod share;
pub mod telemetry;

pub use catalog::{load_catalog, Catalog, CatalogError, Category};
pub use scoring::{
    calculate_method_result, calculate_scores, validate_inputs, InputRecord, MethodResult,
    ScoringResult, ValidationReport,
};
