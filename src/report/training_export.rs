//! Training report export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    ClassCounts, ClassificationReport, FeatureImportance, ImputedColumn, TrainConfig, TrainResult,
    TARGET_COLUMN,
};

/// Metadata about the training run
#[derive(Serialize)]
pub struct TrainingMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub attrition_version: String,
    pub input_file: String,
    pub target_column: String,
    /// Configuration the model was trained with
    pub config: TrainConfig,
}

/// Dataset and split statistics
#[derive(Serialize)]
pub struct TrainingStatistics {
    pub rows: usize,
    pub columns: usize,
    pub feature_count: usize,
    pub categorical_features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub class_counts: ClassCounts,
    pub majority_baseline: f64,
}

/// Complete training report with metadata
#[derive(Serialize)]
pub struct TrainingReportExport<'a> {
    pub metadata: TrainingMetadata,
    pub statistics: TrainingStatistics,
    pub accuracy: f64,
    pub classification_report: &'a ClassificationReport,
    pub feature_importance: &'a [FeatureImportance],
    pub imputed_columns: &'a [ImputedColumn],
}

/// Build the export structure for a training result
pub fn build_training_report<'a>(
    result: &'a TrainResult,
    input_file: &str,
    config: &TrainConfig,
) -> TrainingReportExport<'a> {
    TrainingReportExport {
        metadata: TrainingMetadata {
            timestamp: Utc::now().to_rfc3339(),
            attrition_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            target_column: TARGET_COLUMN.to_string(),
            config: config.clone(),
        },
        statistics: TrainingStatistics {
            rows: result.data_shape.0,
            columns: result.data_shape.1,
            feature_count: result.schema.len(),
            categorical_features: result.schema.categorical_count(),
            train_rows: result.train_rows,
            test_rows: result.test_rows,
            class_counts: result.class_counts,
            majority_baseline: result.class_counts.majority_baseline(),
        },
        accuracy: result.accuracy,
        classification_report: &result.classification_report,
        feature_importance: &result.feature_importance,
        imputed_columns: &result.imputed,
    }
}

/// Export a training result to a JSON file
///
/// # Arguments
/// * `result` - Outcome of a successful training run
/// * `output_path` - Path to write the JSON file
/// * `input_file` - Dataset the model was trained on
/// * `config` - Configuration used for training
pub fn export_training_report(
    result: &TrainResult,
    output_path: &Path,
    input_file: &str,
    config: &TrainConfig,
) -> Result<()> {
    let export = build_training_report(result, input_file, config);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize training report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write training report to {}",
            output_path.display()
        )
    })?;

    tracing::debug!(path = %output_path.display(), "Training report written");
    Ok(())
}
