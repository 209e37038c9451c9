use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One option string per factor key, as supplied by the caller.
///
/// The record itself is not checked against any catalog; empty values are
/// treated as absent so that blank form fields and `key=` assignments
/// behave like missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: BTreeMap<String, String>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a factor value. An empty value clears the factor.
    pub fn set(&mut self, factor: impl Into<String>, option: impl Into<String>) {
        let factor = factor.into();
        let option = option.into();
        if option.is_empty() {
            self.values.remove(&factor);
        } else {
            self.values.insert(factor, option);
        }
    }

    /// Builder-style [`InputRecord::set`]
    pub fn with(mut self, factor: impl Into<String>, option: impl Into<String>) -> Self {
        self.set(factor, option);
        self
    }

    pub fn get(&self, factor: &str) -> Option<&str> {
        self.values
            .get(factor)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn remove(&mut self, factor: &str) -> Option<String> {
        self.values.remove(factor)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay another record; its values win.
    pub fn merge(&mut self, other: InputRecord) {
        for (factor, option) in other.values {
            self.set(factor, option);
        }
    }

    /// Parse a `key=value` assignment (e.g. `thickness=V. Thick`).
    pub fn parse_assignment(s: &str) -> Result<(String, String)> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("Expected key=value, got '{}'", s);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Missing factor name in '{}'", s);
        }
        Ok((key.to_string(), value.trim().to_string()))
    }

    /// Build a record from `key=value` assignments. Later assignments win.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut record = Self::new();
        for assignment in assignments {
            let (key, value) = Self::parse_assignment(assignment.as_ref())?;
            record.set(key, value);
        }
        Ok(record)
    }

    /// Load a record from a YAML (or JSON) mapping of factor to option.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file at {}", path.display()))?;
        let values: BTreeMap<String, String> = serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse inputs: invalid YAML in {}", path.display()))?;

        let mut record = Self::new();
        for (factor, option) in values {
            record.set(factor, option.trim());
        }
        Ok(record)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (factor, option) in iter {
            record.set(factor, option);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_empty_value_is_absent() {
        let mut record = InputRecord::new().with("shape", "Irregular");
        record.set("shape", "");
        assert!(record.get("shape").is_none());
        assert!(record.is_empty());
    }

    #[test]
    fn test_collected_record_skips_empty_values() {
        let record: InputRecord = [("shape", "Irregular"), ("depth", ""), ("grade", "High")]
            .into_iter()
            .collect();
        assert_eq!(record.len(), 2);
        assert!(record.get("depth").is_none());
        assert_eq!(record.iter().count(), record.len());
    }

    #[test]
    fn test_parse_assignment_keeps_inner_spaces() {
        let (key, value) = InputRecord::parse_assignment(" thickness = V. Thick ").unwrap();
        assert_eq!(key, "thickness");
        assert_eq!(value, "V. Thick");
    }

    #[test]
    fn test_parse_assignment_splits_on_first_equals() {
        let (key, value) = InputRecord::parse_assignment("note=a=b").unwrap();
        assert_eq!(key, "note");
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(InputRecord::parse_assignment("thickness").is_err());
        assert!(InputRecord::parse_assignment("=Thick").is_err());
    }

    #[test]
    fn test_later_assignment_wins() {
        let record =
            InputRecord::from_assignments(&["depth=<100m", "depth=>600m", "grade=High"]).unwrap();
        assert_eq!(record.get("depth"), Some(">600m"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_merge_overrides_and_clears() {
        let mut base: InputRecord = [("shape", "Irregular"), ("grade", "Low")].into_iter().collect();
        let overlay: InputRecord = [("grade", "High"), ("depth", ">600m")].into_iter().collect();
        base.merge(overlay);
        assert_eq!(base.get("shape"), Some("Irregular"));
        assert_eq!(base.get("grade"), Some("High"));
        assert_eq!(base.get("depth"), Some(">600m"));
    }

    #[test]
    fn test_load_yaml_file() {
        let temp_path = env::temp_dir().join("method_selector_test_inputs.yaml");
        fs::write(
            &temp_path,
            "shape: \"Platy/Tabular\"\nthickness: \"Thick\"\ndepth: \"\"\n",
        )
        .unwrap();

        let record = InputRecord::load(&temp_path).unwrap();
        assert_eq!(record.get("shape"), Some("Platy/Tabular"));
        assert_eq!(record.get("thickness"), Some("Thick"));
        assert!(record.get("depth").is_none());
        assert_eq!(record.len(), 2);

        let _ = fs::remove_file(&temp_path);
    }
}
