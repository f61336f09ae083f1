//! The attrition pipeline: training, single-record inference, importances
//!
//! A trained pipeline holds exactly one *generation*: the feature schema, the
//! categorical encoders and the forest produced by one successful `train`
//! call. A new generation is built completely before it replaces the old
//! one, so a failed `train` never leaves a mix of old and new state behind.

use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::encoder::ColumnEncoder;
use super::error::{PipelineError, PipelineResult};
use super::forest::{ForestConfig, RandomForest};
use super::metrics::ClassificationReport;
use super::missing::ImputedColumn;
use super::preprocess::{commit_unseen, encode_record, prepare_training_data};
use super::record::Record;
use super::schema::FeatureSchema;
use super::split::stratified_split;
use super::target::{ClassCounts, TargetMapping};

/// Model type reported by [`AttritionPipeline::status`]
pub const MODEL_TYPE: &str = "Random Forest Classifier";

/// Default fraction of rows held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub forest: ForestConfig,
    /// Fraction of rows held out for evaluation; the split reuses the forest seed
    pub test_size: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

/// Importance score of one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Outcome of a successful `train` call
#[derive(Debug, Clone, Serialize)]
pub struct TrainResult {
    /// Accuracy on the held-out rows
    pub accuracy: f64,
    /// Sorted by importance, highest first
    pub feature_importance: Vec<FeatureImportance>,
    pub classification_report: ClassificationReport,
    /// `(rows, columns)` of the input table
    pub data_shape: (usize, usize),
    pub train_rows: usize,
    pub test_rows: usize,
    pub class_counts: ClassCounts,
    pub imputed: Vec<ImputedColumn>,
    pub schema: FeatureSchema,
}

/// Outcome of a successful `predict_one` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// 1 for attrition, 0 otherwise
    pub label: u8,
    /// Probability of attrition
    pub probability: f64,
    /// Probability of the predicted class
    pub confidence: f64,
}

/// Per-column count of inference values mapped to the sentinel category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownFallback {
    pub column: String,
    pub count: u64,
}

/// Snapshot of the pipeline state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub is_trained: bool,
    pub feature_count: usize,
    pub model_type: String,
    /// Columns that hit the sentinel in the current generation, sorted by name
    pub unknown_fallbacks: Vec<UnknownFallback>,
}

/// One complete, consistent result of a successful `train`
#[derive(Debug, Clone)]
struct Generation {
    schema: FeatureSchema,
    encoders: HashMap<String, ColumnEncoder>,
    model: RandomForest,
}

impl Generation {
    fn ranked_importances(&self) -> Vec<FeatureImportance> {
        rank_features(&self.schema.names(), self.model.feature_importances())
    }
}

/// Pair feature names with scores and sort descending (stable for ties)
pub fn rank_features(names: &[String], importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(importances)
        .map(|(feature, &importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Attrition classifier with its preprocessing state
#[derive(Debug, Clone, Default)]
pub struct AttritionPipeline {
    config: TrainConfig,
    mapping: TargetMapping,
    generation: Option<Generation>,
}

impl AttritionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrainConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.generation.is_some()
    }

    /// Schema of the current generation
    pub fn schema(&self) -> Option<&FeatureSchema> {
        self.generation.as_ref().map(|g| &g.schema)
    }

    /// Encoder of a categorical column in the current generation
    pub fn encoder(&self, column: &str) -> Option<&ColumnEncoder> {
        self.generation.as_ref().and_then(|g| g.encoders.get(column))
    }

    /// Train a new generation on `df` and commit it on success.
    ///
    /// On error the previous generation (if any) stays in place.
    pub fn train(&mut self, df: &DataFrame) -> PipelineResult<TrainResult> {
        let (generation, result) = self.build_generation(df)?;
        self.generation = Some(generation);

        tracing::info!(
            accuracy = result.accuracy,
            features = result.schema.len(),
            rows = result.data_shape.0,
            "Committed new model generation"
        );

        Ok(result)
    }

    fn build_generation(&self, df: &DataFrame) -> PipelineResult<(Generation, TrainResult)> {
        let prepared = prepare_training_data(df, &self.mapping)?;
        let split = stratified_split(
            &prepared.target,
            self.config.test_size,
            self.config.forest.seed,
        )?;

        let select = |indices: &[usize]| -> (Vec<Vec<f64>>, Vec<u8>) {
            indices
                .iter()
                .map(|&i| (prepared.features[i].clone(), prepared.target[i]))
                .unzip()
        };
        let (x_train, y_train) = select(&split.train);
        let (x_test, y_test) = select(&split.test);

        let model = RandomForest::fit(&x_train, &y_train, &self.config.forest)?;

        let y_pred = model.predict_many(&x_test)?;
        let classification_report = ClassificationReport::new(&y_test, &y_pred, &self.mapping);

        let generation = Generation {
            schema: prepared.schema,
            encoders: prepared.encoders,
            model,
        };

        let result = TrainResult {
            accuracy: classification_report.accuracy,
            feature_importance: generation.ranked_importances(),
            classification_report,
            data_shape: df.shape(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            class_counts: ClassCounts::from_target(&prepared.target),
            imputed: prepared.imputed,
            schema: generation.schema.clone(),
        };

        Ok((generation, result))
    }

    /// Predict attrition for a single record.
    ///
    /// Absent schema columns count as 0, extra columns are ignored and unseen
    /// categories are mapped to the sentinel. Coercion and inference failures
    /// come back as `PredictionError` and leave the encoders untouched.
    pub fn predict_one(&mut self, record: &Record) -> PipelineResult<Prediction> {
        let generation = self.generation.as_mut().ok_or(PipelineError::NotTrained)?;

        let encoded = encode_record(&generation.schema, &generation.encoders, record)
            .map_err(PipelineError::prediction)?;
        let proba = generation
            .model
            .predict_proba(&encoded.row)
            .map_err(PipelineError::prediction)?;

        // Only a successful prediction adds the sentinel and counts the fallback
        commit_unseen(&mut generation.encoders, &encoded.unseen);

        let label = super::forest::class_from_proba(&proba);
        Ok(Prediction {
            label,
            probability: proba[1],
            confidence: proba[0].max(proba[1]),
        })
    }

    /// Feature importances of the current generation, highest first
    pub fn feature_importance(&self) -> PipelineResult<Vec<FeatureImportance>> {
        let generation = self.generation.as_ref().ok_or(PipelineError::NotTrained)?;
        Ok(generation.ranked_importances())
    }

    pub fn status(&self) -> ModelStatus {
        let (feature_count, mut unknown_fallbacks) = match &self.generation {
            Some(generation) => (
                generation.schema.len(),
                generation
                    .encoders
                    .values()
                    .filter(|e| e.unknown_hits() > 0)
                    .map(|e| UnknownFallback {
                        column: e.column().to_string(),
                        count: e.unknown_hits(),
                    })
                    .collect::<Vec<_>>(),
            ),
            None => (0, Vec::new()),
        };
        unknown_fallbacks.sort_by(|a, b| a.column.cmp(&b.column));

        ModelStatus {
            is_trained: self.is_trained(),
            feature_count,
            model_type: MODEL_TYPE.to_string(),
            unknown_fallbacks,
        }
    }
}
