use serde::Serialize;
use thiserror::Error;

use super::inputs::InputRecord;
use crate::catalog::Catalog;

/// A problem with one factor of an input record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputError {
    #[error("{label} is required")]
    Required { label: String },
    #[error("Invalid option for {label}")]
    InvalidOption {
        label: String,
        value: String,
        options: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub factor: String,
    pub error: InputError,
}

/// Outcome of [`validate_inputs`], one entry per offending factor in
/// catalog declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    is_valid: bool,
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, factor: &str) -> Option<&InputError> {
        self.errors
            .iter()
            .find(|e| e.factor == factor)
            .map(|e| &e.error)
    }
}

/// Check an input record against the catalog's factors and their legal options.
/// Returns all validation errors at once (not just the first).
///
/// Keys the catalog does not declare are ignored.
pub fn validate_inputs(catalog: &Catalog, inputs: &InputRecord) -> ValidationReport {
    let mut errors = Vec::new();

    for factor in catalog.factors() {
        match inputs.get(&factor.key) {
            None => errors.push(FieldError {
                factor: factor.key.clone(),
                error: InputError::Required {
                    label: factor.label.clone(),
                },
            }),
            Some(value) if !factor.accepts(value) => errors.push(FieldError {
                factor: factor.key.clone(),
                error: InputError::InvalidOption {
                    label: factor.label.clone(),
                    value: value.to_string(),
                    options: factor.options.clone(),
                },
            }),
            Some(_) => {}
        }
    }

    tracing::debug!(errors = errors.len(), "inputs validated");

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
