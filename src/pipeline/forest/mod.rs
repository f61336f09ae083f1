//! Random forest classifier
//!
//! Bagged CART trees (`tree`) grown in parallel with rayon. Every tree draws
//! a bootstrap sample and a random feature order from its own seeded RNG, so
//! the fitted forest depends only on the data and [`ForestConfig::seed`].

pub mod config;
pub mod tree;

pub use config::*;
pub use tree::{gini_impurity, DecisionTree, Node, TreeParams};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::error::{PipelineError, PipelineResult};

/// A fitted random forest for a binary target
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    feature_importances: Vec<f64>,
    config: ForestConfig,
}

impl RandomForest {
    /// Fit a forest on row-major `features` and a 0/1 `target`.
    pub fn fit(
        features: &[Vec<f64>],
        target: &[u8],
        config: &ForestConfig,
    ) -> PipelineResult<Self> {
        config.validate().map_err(PipelineError::malformed)?;

        if features.is_empty() {
            return Err(PipelineError::malformed("Cannot fit a forest on zero rows"));
        }
        if features.len() != target.len() {
            return Err(PipelineError::malformed(format!(
                "Feature rows ({}) and target values ({}) differ in length",
                features.len(),
                target.len()
            )));
        }

        let n_features = features[0].len();
        if n_features == 0 {
            return Err(PipelineError::malformed("No feature columns to train on"));
        }
        if let Some(row) = features.iter().position(|r| r.len() != n_features) {
            return Err(PipelineError::malformed(format!(
                "Row {} has {} features, expected {}",
                row,
                features[row].len(),
                n_features
            )));
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features(n_features),
        };
        let n_rows = features.len();

        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(config.tree_seed(index));
                let bootstrap: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
                DecisionTree::fit(features, target, bootstrap, params, rng)
            })
            .collect();

        let feature_importances = average_importances(&trees, n_features);

        tracing::debug!(
            trees = trees.len(),
            rows = n_rows,
            features = n_features,
            max_features = params.max_features,
            "Random forest fitted"
        );

        Ok(Self {
            trees,
            n_features,
            feature_importances,
            config: config.clone(),
        })
    }

    /// Class probabilities `[P(0), P(1)]` for one row, averaged over trees
    pub fn predict_proba(&self, row: &[f64]) -> PipelineResult<[f64; 2]> {
        if row.len() != self.n_features {
            return Err(PipelineError::prediction(PipelineError::malformed(format!(
                "Row has {} features, model expects {}",
                row.len(),
                self.n_features
            ))));
        }

        let positive: f64 =
            self.trees.iter().map(|t| t.predict_proba(row)).sum::<f64>() / self.trees.len() as f64;
        let positive = positive.clamp(0.0, 1.0);

        Ok([1.0 - positive, positive])
    }

    /// Predicted class; ties go to class 0
    pub fn predict(&self, row: &[f64]) -> PipelineResult<u8> {
        let proba = self.predict_proba(row)?;
        Ok(class_from_proba(&proba))
    }

    /// Predicted classes for many rows
    pub fn predict_many(&self, rows: &[Vec<f64>]) -> PipelineResult<Vec<u8>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Mean decrease in impurity per feature, summing to 1 unless every tree is a single leaf
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

/// Argmax over two class probabilities; ties go to class 0
pub fn class_from_proba(proba: &[f64; 2]) -> u8 {
    if proba[1] > proba[0] {
        1
    } else {
        0
    }
}

/// Average per-tree importances over trees that split at least once, then renormalize
fn average_importances(trees: &[DecisionTree], n_features: usize) -> Vec<f64> {
    let mut totals = vec![0.0; n_features];
    let mut contributing = 0usize;

    for tree in trees.iter().filter(|t| t.node_count() > 1) {
        for (total, value) in totals.iter_mut().zip(tree.importances()) {
            *total += value;
        }
        contributing += 1;
    }

    if contributing == 0 {
        return totals;
    }

    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter_mut().for_each(|v| *v /= sum);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feature 0 separates the classes, feature 1 is noise
    fn separable_data(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut rng = StdRng::seed_from_u64(9);
        let features: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let base = if i % 2 == 0 { 1.0 } else { 10.0 };
                vec![base + rng.gen::<f64>(), rng.gen::<f64>()]
            })
            .collect();
        let target: Vec<u8> = (0..n).map(|i| (i % 2) as u8).collect();
        (features, target)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (features, target) = separable_data(60);
        let forest = RandomForest::fit(&features, &target, &small_config()).unwrap();

        assert_eq!(forest.trees().len(), 20);
        assert_eq!(forest.predict(&[1.2, 0.5]).unwrap(), 0);
        assert_eq!(forest.predict(&[10.4, 0.5]).unwrap(), 1);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (features, target) = separable_data(40);
        let forest = RandomForest::fit(&features, &target, &small_config()).unwrap();

        let proba = forest.predict_proba(&[5.0, 0.5]).unwrap();
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_importances_normalized_and_ranked() {
        let (features, target) = separable_data(80);
        let forest = RandomForest::fit(&features, &target, &small_config()).unwrap();

        let importances = forest.feature_importances();
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, target) = separable_data(50);
        let a = RandomForest::fit(&features, &target, &small_config()).unwrap();
        let b = RandomForest::fit(&features, &target, &small_config()).unwrap();

        assert_eq!(a.feature_importances(), b.feature_importances());
        for (ta, tb) in a.trees().iter().zip(b.trees()) {
            assert_eq!(ta.nodes(), tb.nodes());
        }
    }

    #[test]
    fn test_wrong_row_width_rejected() {
        let (features, target) = separable_data(20);
        let forest = RandomForest::fit(&features, &target, &small_config()).unwrap();

        let err = forest.predict_proba(&[1.0]).unwrap_err();
        assert!(matches!(err, PipelineError::PredictionError { .. }));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = RandomForest::fit(&[], &[], &small_config()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDataset { .. }));
    }

    #[test]
    fn test_all_stumps_give_zero_importances() {
        let features: Vec<Vec<f64>> = (0..10).map(|_| vec![3.0]).collect();
        let target: Vec<u8> = (0..10).map(|i| (i % 2) as u8).collect();
        let forest = RandomForest::fit(&features, &target, &small_config()).unwrap();

        assert_eq!(forest.feature_importances(), &[0.0]);
    }

    #[test]
    fn test_class_from_proba_tie() {
        assert_eq!(class_from_proba(&[0.5, 0.5]), 0);
        assert_eq!(class_from_proba(&[0.4, 0.6]), 1);
    }
}
