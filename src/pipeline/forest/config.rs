//! Random forest hyperparameters

use serde::{Deserialize, Serialize};

/// Default number of trees
pub const DEFAULT_N_TREES: usize = 100;
/// Default maximum tree depth
pub const DEFAULT_MAX_DEPTH: usize = 10;
/// Default minimum rows needed to split an internal node
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 5;
/// Default minimum rows in each leaf
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 2;
/// Default seed for bootstrap sampling, feature sampling and the split
pub const DEFAULT_SEED: u64 = 42;

/// Random forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_N_TREES,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestConfig {
    /// Features considered per split: `floor(sqrt(n_features))`, at least 1
    pub fn max_features(&self, n_features: usize) -> usize {
        ((n_features as f64).sqrt().floor() as usize).max(1)
    }

    /// Check that the configuration can grow a forest
    pub fn validate(&self) -> Result<(), String> {
        if self.n_trees == 0 {
            return Err("n_trees must be at least 1".to_string());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".to_string());
        }
        if self.min_samples_split < 2 {
            return Err(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err("min_samples_leaf must be at least 1".to_string());
        }
        Ok(())
    }

    /// Seed for tree `index`, independent of the order trees are grown in
    pub(crate) fn tree_seed(&self, index: usize) -> u64 {
        self.seed
            .wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
