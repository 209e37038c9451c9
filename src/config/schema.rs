use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User settings read from `config.yaml`.
///
/// Example YAML:
/// ```yaml
/// catalog: /srv/mine-data/site-weights.yaml
/// color: never
/// recommended_only: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Alternate weight catalog used instead of the built-in one
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub color: ColorMode,

    /// Hide eliminated methods in the ranked table
    #[serde(default)]
    pub recommended_only: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn resolve(&self) -> bool {
        match self {
            ColorMode::Auto => crate::output::should_use_colors(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_parse() {
        let settings: Settings = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.color, ColorMode::Auto);
    }

    #[test]
    fn test_full_settings_parse() {
        let yaml = r#"
catalog: /srv/weights/site.yaml
color: never
recommended_only: true
"#;
        let settings: Settings = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(settings.catalog, Some(PathBuf::from("/srv/weights/site.yaml")));
        assert_eq!(settings.color, ColorMode::Never);
        assert!(settings.recommended_only);
        assert!(!settings.color.resolve());
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let result: Result<Settings, _> = serde_saphyr::from_str("colour: always");
        assert!(result.is_err());
    }
}
