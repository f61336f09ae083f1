//! Missing value analysis and imputation
//!
//! Numeric columns are filled with their median, everything else with its
//! mode. Imputation also normalizes the table: numeric (and boolean) columns
//! come out as `Float64`, all other columns as `String`.

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, PipelineResult};

/// How a column's missing cells were filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImputeStrategy {
    Median,
    Mode,
}

impl std::fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeStrategy::Median => write!(f, "median"),
            ImputeStrategy::Mode => write!(f, "mode"),
        }
    }
}

/// Record of one imputed column
#[derive(Debug, Clone, Serialize)]
pub struct ImputedColumn {
    pub column: String,
    pub strategy: ImputeStrategy,
    /// Fill value rendered as text
    pub fill_value: String,
    /// Number of cells that were filled
    pub filled: usize,
    /// Fraction of the column that was missing
    pub missing_ratio: f64,
}

/// Whether a column is treated as numeric by the pipeline
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)
}

/// Fill missing cells column by column.
///
/// Columns with no non-missing values at all are passed through with their
/// nulls intact. Infinite values in numeric columns are rejected.
pub fn impute_missing(df: &DataFrame) -> PipelineResult<(DataFrame, Vec<ImputedColumn>)> {
    let height = df.height();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut imputed: Vec<ImputedColumn> = Vec::new();

    for column in df.get_columns() {
        let name = column.name().clone();

        if is_numeric_dtype(column.dtype()) {
            let values = numeric_values(column)?;
            if let Some(value) = values.iter().flatten().find(|v| v.is_infinite()) {
                return Err(PipelineError::malformed(format!(
                    "Numeric column '{}' contains a non-finite value ({})",
                    name, value
                )));
            }
            let missing = values.iter().filter(|v| v.is_none()).count();

            match median(&values) {
                Some(fill) if missing > 0 => {
                    let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
                    imputed.push(ImputedColumn {
                        column: name.to_string(),
                        strategy: ImputeStrategy::Median,
                        fill_value: format!("{}", fill),
                        filled: missing,
                        missing_ratio: missing as f64 / height as f64,
                    });
                    columns.push(Column::new(name, filled));
                }
                _ => columns.push(Column::new(name, values)),
            }
        } else {
            let values = string_values(column)?;
            let missing = values.iter().filter(|v| v.is_none()).count();

            match mode(&values) {
                Some(fill) if missing > 0 => {
                    let filled: Vec<Option<String>> = values
                        .into_iter()
                        .map(|v| Some(v.unwrap_or_else(|| fill.clone())))
                        .collect();
                    imputed.push(ImputedColumn {
                        column: name.to_string(),
                        strategy: ImputeStrategy::Mode,
                        fill_value: fill,
                        filled: missing,
                        missing_ratio: missing as f64 / height as f64,
                    });
                    columns.push(Column::new(name, filled));
                }
                _ => columns.push(Column::new(name, values)),
            }
        }
    }

    let df = DataFrame::new(columns)?;
    Ok((df, imputed))
}

/// Read a numeric column as `f64`, treating NaN as missing
pub fn numeric_values(column: &Column) -> PipelineResult<Vec<Option<f64>>> {
    let float_col = column.cast(&DataType::Float64)?;
    let values = float_col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Read any column as strings
pub fn string_values(column: &Column) -> PipelineResult<Vec<Option<String>>> {
    let string_col = column.cast(&DataType::String)?;
    let values = string_col
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Median of the non-missing values; mean of the middle pair for even counts
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Most frequent non-missing value; ties go to the value seen first
pub fn mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for value in values.iter().flatten() {
        let count = counts.entry(value.as_str()).or_insert(0);
        if *count == 0 {
            order.push(value.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
}

/// Fraction of missing cells per column, sorted descending
pub fn analyze_missing_values(df: &DataFrame) -> PipelineResult<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let height = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = Vec::new();

    for column in df.get_columns() {
        let missing = if is_numeric_dtype(column.dtype()) {
            numeric_values(column)?.iter().filter(|v| v.is_none()).count()
        } else {
            column.null_count()
        };
        missing_ratios.push((column.name().to_string(), missing as f64 / height));
    }

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}
