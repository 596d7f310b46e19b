//! Intake configuration.
//!
//! All fields have defaults, so an empty TOML document is valid:
//!
//! ```toml
//! match_threshold = 0.6
//! min_name_length = 2
//! recommended_groups = ["GroupA", "GroupB", "GroupC"]
//! qualification_range = [1.0, 10.0]
//! schema_version = "1.0"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for header reconciliation, validation heuristics, and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// A header is claimed only when its score is strictly above this.
    pub match_threshold: f64,
    /// Names shorter than this (in characters) draw a warning.
    pub min_name_length: usize,
    /// Recognized `GroupTag` / `WorkerGroup` values.
    pub recommended_groups: Vec<String>,
    /// Expected inclusive `QualificationLevel` range.
    pub qualification_range: (f64, f64),
    /// Schema version written into export metadata.
    pub schema_version: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.6,
            min_name_length: 2,
            recommended_groups: vec!["GroupA".into(), "GroupB".into(), "GroupC".into()],
            qualification_range: (1.0, 10.0),
            schema_version: "1.0".into(),
        }
    }
}

impl IntakeConfig {
    /// Parses a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Sets the header match threshold.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Sets the recognized group tags.
    pub fn with_recommended_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommended_groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntakeError;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = IntakeConfig::from_toml_str("").unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert!((config.match_threshold - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_partial_override() {
        let config = IntakeConfig::from_toml_str(
            r#"
            match_threshold = 0.75
            recommended_groups = ["Ops", "Sales"]
            "#,
        )
        .unwrap();
        assert!((config.match_threshold - 0.75).abs() < 1e-10);
        assert_eq!(config.recommended_groups, vec!["Ops", "Sales"]);
        assert_eq!(config.min_name_length, 2);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = IntakeConfig::from_toml_str("match_threshold = \"high\"").unwrap_err();
        assert!(matches!(err, IntakeError::Config(_)));
    }
}
