//! Feature schema fixed at training time

use serde::Serialize;

/// Type of feature (numeric or categorical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureType {
    Numeric,
    Categorical,
}

/// One model input column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureColumn {
    pub name: String,
    pub feature_type: FeatureType,
}

/// Ordered model input columns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Column names in model input order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn categorical_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.feature_type == FeatureType::Categorical)
            .count()
    }
}
