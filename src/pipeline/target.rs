//! Target column derivation
//!
//! The `Attrition` column is mapped to the binary target the forest is
//! trained on: the event value ("Yes") becomes 1, everything else 0.

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};
use super::missing::string_values;

/// Name of the target column
pub const TARGET_COLUMN: &str = "Attrition";

/// Labels of the two target classes: "Yes" is the event (1), "No" the non-event (0)
#[derive(Debug, Clone, Serialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Label shown for a binary class
    pub fn label(&self, class: u8) -> &str {
        if class == 1 {
            &self.event_value
        } else {
            &self.non_event_value
        }
    }
}

impl Default for TargetMapping {
    fn default() -> Self {
        Self {
            event_value: "Yes".to_string(),
            non_event_value: "No".to_string(),
        }
    }
}

/// Number of rows per target class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub events: usize,
    pub non_events: usize,
}

impl ClassCounts {
    pub fn from_target(target: &[u8]) -> Self {
        let events = target.iter().filter(|&&t| t == 1).count();
        Self {
            events,
            non_events: target.len() - events,
        }
    }

    pub fn total(&self) -> usize {
        self.events + self.non_events
    }

    /// Accuracy of always predicting the larger class
    pub fn majority_baseline(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.events.max(self.non_events) as f64 / self.total() as f64
    }
}

/// Fail with `MalformedDataset` unless the target column is present
pub fn require_target_column(df: &DataFrame, target: &str) -> PipelineResult<()> {
    let present = df.get_column_names().iter().any(|name| name.as_str() == target);
    if !present {
        return Err(PipelineError::malformed(format!(
            "Missing required columns: ['{}']",
            target
        )));
    }
    Ok(())
}

/// Derive the binary target: 1 where the column equals the event value, else 0.
///
/// Comparison is exact and case-sensitive. Values matching neither side of
/// the mapping count as 0 and are reported with a warning.
pub fn create_binary_target(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> PipelineResult<Vec<u8>> {
    require_target_column(df, target)?;
    let column = df.column(target)?;
    let values = string_values(column)?;

    let mut unexpected = 0usize;
    let binary: Vec<u8> = values
        .iter()
        .map(|v| match v.as_deref() {
            Some(s) if s == mapping.event_value => 1,
            Some(s) if s == mapping.non_event_value => 0,
            _ => {
                unexpected += 1;
                0
            }
        })
        .collect();

    if unexpected > 0 {
        tracing::warn!(
            column = target,
            count = unexpected,
            "Target values other than '{}'/'{}' treated as '{}'",
            mapping.event_value,
            mapping.non_event_value,
            mapping.non_event_value
        );
    }

    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_maps_to_one() {
        let df = df! {
            "Attrition" => ["Yes", "No", "No", "Yes"],
        }
        .unwrap();

        let target = create_binary_target(&df, TARGET_COLUMN, &TargetMapping::default()).unwrap();
        assert_eq!(target, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let df = df! {
            "Attrition" => ["yes", "YES", "Yes", "No"],
        }
        .unwrap();

        let target = create_binary_target(&df, TARGET_COLUMN, &TargetMapping::default()).unwrap();
        assert_eq!(target, vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_missing_target_column() {
        let df = df! {
            "Age" => [30i32, 40],
        }
        .unwrap();

        let err = create_binary_target(&df, TARGET_COLUMN, &TargetMapping::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDataset { .. }));
        assert!(err.to_string().contains("Attrition"));
    }

    #[test]
    fn test_class_counts() {
        let counts = ClassCounts::from_target(&[1, 0, 0, 0, 1]);
        assert_eq!(counts.events, 2);
        assert_eq!(counts.non_events, 3);
        assert!((counts.majority_baseline() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_mapping_labels() {
        let mapping = TargetMapping::default();
        assert_eq!(mapping.label(1), "Yes");
        assert_eq!(mapping.label(0), "No");
    }
}
