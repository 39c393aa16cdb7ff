//! Cleaning policies and their configuration.
//!
//! Each cleaning axis (numeric, categorical, duplicates) is a closed enum.
//! Free-form selector labels coming from a UI are validated once, here, via
//! [`std::str::FromStr`]; everything past this module works with the enums.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Policy for missing values in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericPolicy {
    /// Remove rows missing a value in any numeric column
    DropRows,
    /// Fill with the mean of the column's numeric values
    FillMean,
    /// Fill with the lower median of the column's numeric values
    FillMedian,
    /// Fill with 0
    FillZero,
    /// Leave numeric columns untouched
    #[default]
    Keep,
}

/// Policy for missing values in categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoricalPolicy {
    /// Remove rows missing a value in any categorical column
    DropRows,
    /// Fill with the most frequent value
    FillMode,
    /// Fill with the literal "Unknown"
    FillUnknown,
    /// Leave categorical columns untouched
    #[default]
    Keep,
}

/// Policy for duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DuplicatePolicy {
    /// Keep the first occurrence of each distinct row
    RemoveDuplicates,
    #[default]
    Keep,
}

/// Errors that can occur while validating cleaning options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Unknown {axis} policy '{label}'")]
    UnknownPolicy { axis: &'static str, label: String },
}

/// Lowercase, drop quotes, and join words with `-`, so `Fill with "Unknown"` becomes `fill-with-unknown`.
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['"', '\''], "")
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl NumericPolicy {
    /// The selector label shown in the cleaning form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DropRows => "Drop rows",
            Self::FillMean => "Fill with Mean",
            Self::FillMedian => "Fill with Median",
            Self::FillZero => "Fill with Zero",
            Self::Keep => "None",
        }
    }
}

impl FromStr for NumericPolicy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "drop-rows" | "drop" => Ok(Self::DropRows),
            "fill-with-mean" | "fill-mean" | "mean" => Ok(Self::FillMean),
            "fill-with-median" | "fill-median" | "median" => Ok(Self::FillMedian),
            "fill-with-zero" | "fill-zero" | "zero" => Ok(Self::FillZero),
            "none" | "keep" | "" => Ok(Self::Keep),
            _ => Err(ConfigValidationError::UnknownPolicy {
                axis: "numeric",
                label: s.to_string(),
            }),
        }
    }
}

impl CategoricalPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DropRows => "Drop rows",
            Self::FillMode => "Fill with Mode",
            Self::FillUnknown => "Fill with \"Unknown\"",
            Self::Keep => "None",
        }
    }
}

impl FromStr for CategoricalPolicy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "drop-rows" | "drop" => Ok(Self::DropRows),
            "fill-with-mode" | "fill-mode" | "mode" => Ok(Self::FillMode),
            "fill-with-unknown" | "fill-unknown" | "unknown" => Ok(Self::FillUnknown),
            "none" | "keep" | "" => Ok(Self::Keep),
            _ => Err(ConfigValidationError::UnknownPolicy {
                axis: "categorical",
                label: s.to_string(),
            }),
        }
    }
}

impl DuplicatePolicy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "Remove duplicates",
            Self::Keep => "None",
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "remove-duplicates" | "remove" | "dedup" => Ok(Self::RemoveDuplicates),
            "none" | "keep" | "keep-all" | "" => Ok(Self::Keep),
            _ => Err(ConfigValidationError::UnknownPolicy {
                axis: "duplicate",
                label: s.to_string(),
            }),
        }
    }
}

/// Cleaning configuration: one policy per axis.
///
/// The default leaves the dataset untouched.
///
/// # Example
///
/// ```rust,ignore
/// use insight_core::config::{CleaningConfig, NumericPolicy, DuplicatePolicy};
///
/// let config = CleaningConfig::builder()
///     .numeric(NumericPolicy::FillMedian)
///     .duplicates(DuplicatePolicy::RemoveDuplicates)
///     .build();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    /// Policy for missing numeric values.
    #[serde(default)]
    pub numeric: NumericPolicy,

    /// Policy for missing categorical values.
    #[serde(default)]
    pub categorical: CategoricalPolicy,

    /// Policy for duplicate rows. Applied before the other two.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl CleaningConfig {
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Build a configuration from the three selector labels of the cleaning form.
    pub fn from_labels(
        numeric: &str,
        categorical: &str,
        duplicates: &str,
    ) -> Result<Self, ConfigValidationError> {
        Ok(Self {
            numeric: numeric.parse()?,
            categorical: categorical.parse()?,
            duplicates: duplicates.parse()?,
        })
    }

    /// True when no axis would change the dataset.
    pub fn is_noop(&self) -> bool {
        self.numeric == NumericPolicy::Keep
            && self.categorical == CategoricalPolicy::Keep
            && self.duplicates == DuplicatePolicy::Keep
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    numeric: Option<NumericPolicy>,
    categorical: Option<CategoricalPolicy>,
    duplicates: Option<DuplicatePolicy>,
}

impl CleaningConfigBuilder {
    /// Set the numeric missing-value policy.
    pub fn numeric(mut self, policy: NumericPolicy) -> Self {
        self.numeric = Some(policy);
        self
    }

    /// Set the categorical missing-value policy.
    pub fn categorical(mut self, policy: CategoricalPolicy) -> Self {
        self.categorical = Some(policy);
        self
    }

    /// Set the duplicate-row policy.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = Some(policy);
        self
    }

    /// Shorthand for `duplicates(RemoveDuplicates)` / `duplicates(Keep)`.
    pub fn remove_duplicates(self, remove: bool) -> Self {
        self.duplicates(if remove {
            DuplicatePolicy::RemoveDuplicates
        } else {
            DuplicatePolicy::Keep
        })
    }

    pub fn build(self) -> CleaningConfig {
        CleaningConfig {
            numeric: self.numeric.unwrap_or_default(),
            categorical: self.categorical.unwrap_or_default(),
            duplicates: self.duplicates.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_noop() {
        let config = CleaningConfig::default();
        assert!(config.is_noop());
        assert_eq!(config, CleaningConfig::builder().build());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .numeric(NumericPolicy::FillMean)
            .categorical(CategoricalPolicy::FillUnknown)
            .remove_duplicates(true)
            .build();

        assert_eq!(config.numeric, NumericPolicy::FillMean);
        assert_eq!(config.categorical, CategoricalPolicy::FillUnknown);
        assert_eq!(config.duplicates, DuplicatePolicy::RemoveDuplicates);
        assert!(!config.is_noop());
    }

    #[test]
    fn test_parse_ui_labels() {
        let config =
            CleaningConfig::from_labels("Fill with Median", "Fill with \"Unknown\"", "Remove duplicates")
                .unwrap();
        assert_eq!(config.numeric, NumericPolicy::FillMedian);
        assert_eq!(config.categorical, CategoricalPolicy::FillUnknown);
        assert_eq!(config.duplicates, DuplicatePolicy::RemoveDuplicates);

        assert_eq!("Drop rows".parse::<NumericPolicy>().unwrap(), NumericPolicy::DropRows);
        assert_eq!("None".parse::<CategoricalPolicy>().unwrap(), CategoricalPolicy::Keep);
        assert_eq!("fill-zero".parse::<NumericPolicy>().unwrap(), NumericPolicy::FillZero);
    }

    #[test]
    fn test_labels_round_trip() {
        for policy in [
            NumericPolicy::DropRows,
            NumericPolicy::FillMean,
            NumericPolicy::FillMedian,
            NumericPolicy::FillZero,
            NumericPolicy::Keep,
        ] {
            assert_eq!(policy.label().parse::<NumericPolicy>().unwrap(), policy);
        }
        for policy in [
            CategoricalPolicy::DropRows,
            CategoricalPolicy::FillMode,
            CategoricalPolicy::FillUnknown,
            CategoricalPolicy::Keep,
        ] {
            assert_eq!(policy.label().parse::<CategoricalPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = "Fill with Magic".parse::<NumericPolicy>().unwrap_err();
        assert_eq!(
            err,
            ConfigValidationError::UnknownPolicy {
                axis: "numeric",
                label: "Fill with Magic".to_string()
            }
        );
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_config_from_frontend_json() {
        let json = r#"{
            "numeric": "FillZero",
            "categorical": "FillMode"
        }"#;

        let config: CleaningConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.numeric, NumericPolicy::FillZero);
        assert_eq!(config.categorical, CategoricalPolicy::FillMode);
        assert_eq!(config.duplicates, DuplicatePolicy::Keep);
    }
}
