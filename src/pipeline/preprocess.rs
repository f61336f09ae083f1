//! Preprocessing shared by training and inference
//!
//! Training: impute (median, then mode), derive the target, drop the target
//! and non-predictive columns, label-encode every non-numeric column and fix
//! the resulting column order as the feature schema.
//!
//! Inference: coerce a record onto that schema. Absent columns default to 0,
//! unseen categories go through the encoder's sentinel.

use std::collections::HashMap;

use polars::prelude::*;

use super::encoder::ColumnEncoder;
use super::error::{PipelineError, PipelineResult};
use super::missing::{
    impute_missing, is_numeric_dtype, numeric_values, string_values, ImputedColumn,
};
use super::record::{Record, Scalar};
use super::schema::{FeatureColumn, FeatureSchema, FeatureType};
use super::target::{create_binary_target, require_target_column, TargetMapping, TARGET_COLUMN};

/// Identifier and constant columns never used as features
pub const NON_PREDICTIVE_COLUMNS: [&str; 4] =
    ["EmployeeNumber", "Over18", "EmployeeCount", "StandardHours"];

/// Encoded training table
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Row-major feature matrix in schema order
    pub features: Vec<Vec<f64>>,
    pub target: Vec<u8>,
    pub schema: FeatureSchema,
    pub encoders: HashMap<String, ColumnEncoder>,
    pub imputed: Vec<ImputedColumn>,
}

/// Whether a column is excluded from the feature set
pub fn is_excluded_column(name: &str) -> bool {
    name == TARGET_COLUMN || NON_PREDICTIVE_COLUMNS.contains(&name)
}

/// Run the training preprocessing contract on a raw table.
pub fn prepare_training_data(
    df: &DataFrame,
    mapping: &TargetMapping,
) -> PipelineResult<PreparedData> {
    if df.height() == 0 {
        return Err(PipelineError::malformed("Dataset is empty"));
    }
    require_target_column(df, TARGET_COLUMN)?;

    let (filled, imputed) = impute_missing(df)?;
    let target = create_binary_target(&filled, TARGET_COLUMN, mapping)?;

    let mut schema_columns: Vec<FeatureColumn> = Vec::new();
    let mut encoders: HashMap<String, ColumnEncoder> = HashMap::new();
    let mut encoded_columns: Vec<Vec<f64>> = Vec::new();

    for column in filled.get_columns() {
        let name = column.name().as_str();
        if is_excluded_column(name) {
            continue;
        }

        if is_numeric_dtype(column.dtype()) {
            let values: Vec<f64> = numeric_values(column)?
                .into_iter()
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| {
                    PipelineError::malformed(format!(
                        "Numeric column '{}' has no values to impute from",
                        name
                    ))
                })?;

            encoded_columns.push(values);
            schema_columns.push(FeatureColumn {
                name: name.to_string(),
                feature_type: FeatureType::Numeric,
            });
        } else {
            let values = string_values(column)?;
            let (encoder, codes) =
                ColumnEncoder::fit_transform(name, values.iter().map(|v| v.as_deref()));

            encoded_columns.push(codes.into_iter().map(|c| c as f64).collect());
            encoders.insert(name.to_string(), encoder);
            schema_columns.push(FeatureColumn {
                name: name.to_string(),
                feature_type: FeatureType::Categorical,
            });
        }
    }

    if schema_columns.is_empty() {
        return Err(PipelineError::malformed(
            "No feature columns left after removing the target and non-predictive columns",
        ));
    }

    let height = filled.height();
    let features: Vec<Vec<f64>> = (0..height)
        .map(|row| encoded_columns.iter().map(|col| col[row]).collect())
        .collect();

    Ok(PreparedData {
        features,
        target,
        schema: FeatureSchema::new(schema_columns),
        encoders,
        imputed,
    })
}

/// A record encoded against a generation, before any encoder is touched
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    /// Model input row in schema order
    pub row: Vec<f64>,
    /// `(column, value)` pairs that fall back to the sentinel
    pub unseen: Vec<(String, Option<String>)>,
}

/// Encode one record into a model input row in schema order.
///
/// Encoders are only read. Unseen categories get the code the sentinel has
/// or would get, and are listed in [`EncodedRecord::unseen`] for
/// [`commit_unseen`] once the prediction has succeeded.
pub fn encode_record(
    schema: &FeatureSchema,
    encoders: &HashMap<String, ColumnEncoder>,
    record: &Record,
) -> PipelineResult<EncodedRecord> {
    let default = Scalar::Int(0);
    let mut row = Vec::with_capacity(schema.len());
    let mut unseen = Vec::new();

    for column in schema.columns() {
        let value = record.get(&column.name).unwrap_or(&default);

        match column.feature_type {
            FeatureType::Numeric => {
                let number = value
                    .as_numeric()
                    .map_err(|reason| PipelineError::encoding(&column.name, reason))?;
                row.push(number.unwrap_or(0.0));
            }
            FeatureType::Categorical => {
                let encoder = encoders.get(&column.name).ok_or_else(|| {
                    PipelineError::encoding(&column.name, "no encoder for categorical column")
                })?;
                let category = value.as_category();
                let (code, is_fallback) = encoder.peek_lenient(category.as_deref());
                if is_fallback {
                    unseen.push((column.name.clone(), category));
                }
                row.push(code as f64);
            }
        }
    }

    Ok(EncodedRecord { row, unseen })
}

/// Add the sentinel to the encoders an encoded record fell back on
pub fn commit_unseen(
    encoders: &mut HashMap<String, ColumnEncoder>,
    unseen: &[(String, Option<String>)],
) {
    for (column, value) in unseen {
        if let Some(encoder) = encoders.get_mut(column) {
            encoder.encode_lenient(value.as_deref());
        }
    }
}
