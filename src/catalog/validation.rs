use super::schema::{CatalogFile, Category};
use std::collections::{HashMap, HashSet};

/// Validate a parsed catalog before it is used for scoring.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(file: &CatalogFile) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if file.version.trim().is_empty() {
        errors.push("version: must not be empty".to_string());
    }

    if file.elimination_threshold >= 0 {
        errors.push(format!(
            "elimination_threshold: must be negative, got {}",
            file.elimination_threshold
        ));
    }

    // Methods
    if file.methods.is_empty() {
        errors.push("methods: at least one method is required".to_string());
    }
    let mut seen_methods = HashSet::new();
    for (i, method) in file.methods.iter().enumerate() {
        if method.trim().is_empty() {
            errors.push(format!("methods[{}]: name must not be empty", i));
        } else if !seen_methods.insert(method.as_str()) {
            errors.push(format!("methods[{}]: duplicate method '{}'", i, method));
        }
    }

    // Factors
    let mut factor_categories: HashMap<&str, Category> = HashMap::new();
    let mut factor_options: HashMap<&str, HashSet<&str>> = HashMap::new();
    for (i, factor) in file.factors.iter().enumerate() {
        if factor.key.trim().is_empty() {
            errors.push(format!("factors[{}].key: must not be empty", i));
            continue;
        }
        if factor_categories.contains_key(factor.key.as_str()) {
            errors.push(format!("factors[{}].key: duplicate factor '{}'", i, factor.key));
            continue;
        }
        if factor.options.is_empty() {
            errors.push(format!(
                "factors[{}].options: factor '{}' has no options",
                i, factor.key
            ));
        }
        let mut options = HashSet::new();
        for option in &factor.options {
            if option.is_empty() {
                errors.push(format!(
                    "factors[{}].options: factor '{}' has an empty option",
                    i, factor.key
                ));
            } else if !options.insert(option.as_str()) {
                errors.push(format!(
                    "factors[{}].options: duplicate option '{}' for factor '{}'",
                    i, option, factor.key
                ));
            }
        }
        factor_categories.insert(factor.key.as_str(), factor.category);
        factor_options.insert(factor.key.as_str(), options);
    }
    if file.factors.is_empty() {
        errors.push("factors: at least one factor is required".to_string());
    }

    // Categories: each declared exactly once, membership agrees with factors
    let mut declared_categories = HashSet::new();
    let mut assigned: HashMap<&str, usize> = HashMap::new();
    for (i, category) in file.categories.iter().enumerate() {
        if !declared_categories.insert(category.key) {
            errors.push(format!(
                "categories[{}].key: duplicate category '{}'",
                i, category.key
            ));
            continue;
        }
        for factor in &category.factors {
            match factor_categories.get(factor.as_str()) {
                None => errors.push(format!(
                    "categories[{}].factors: unknown factor '{}'",
                    i, factor
                )),
                Some(declared) if *declared != category.key => errors.push(format!(
                    "categories[{}].factors: factor '{}' is declared in '{}', not '{}'",
                    i, factor, declared, category.key
                )),
                Some(_) => *assigned.entry(factor.as_str()).or_insert(0) += 1,
            }
        }
    }
    for category in Category::ALL {
        if !declared_categories.contains(&category) {
            errors.push(format!("categories: missing category '{}'", category));
        }
    }
    for factor in &file.factors {
        match assigned.get(factor.key.as_str()).copied().unwrap_or(0) {
            0 if declared_categories.contains(&factor.category) => errors.push(format!(
                "categories.{}: factor '{}' is not listed",
                factor.category, factor.key
            )),
            0 | 1 => {}
            n => errors.push(format!(
                "categories.{}: factor '{}' is listed {} times",
                factor.category, factor.key, n
            )),
        }
    }

    // Weights
    for method in &file.methods {
        if !file.weights.contains_key(method) {
            errors.push(format!("weights: missing table for method '{}'", method));
        }
    }
    for (method, table) in &file.weights {
        if !seen_methods.contains(method.as_str()) {
            errors.push(format!("weights.{}: unknown method", method));
            continue;
        }
        for (factor, options) in table {
            let Some(legal) = factor_options.get(factor.as_str()) else {
                errors.push(format!("weights.{}.{}: unknown factor", method, factor));
                continue;
            };
            for option in options.keys() {
                if !legal.contains(option.as_str()) {
                    errors.push(format!(
                        "weights.{}.{}: unknown option '{}'",
                        method, factor, option
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
