//! Command-line argument definitions using clap

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::forest::config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_LEAF, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_N_TREES,
    DEFAULT_SEED,
};
use crate::pipeline::{ForestConfig, TrainConfig};

/// Attrition - Predict employee attrition with a random forest
#[derive(Parser, Debug)]
#[command(name = "attrition")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v for info, -vv for debug).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on a dataset and print the evaluation summary
    Train(TrainArgs),

    /// Train on a dataset, then predict attrition for one or more records
    Predict(PredictArgs),
}

/// Dataset input options
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Input file path (CSV or Parquet) with an Attrition column
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Random forest and split options
#[derive(Args, Debug, Clone)]
pub struct ForestArgs {
    /// Number of trees in the forest
    #[arg(long, default_value_t = DEFAULT_N_TREES, value_parser = validate_at_least_one)]
    pub n_trees: usize,

    /// Maximum depth of each tree
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_parser = validate_at_least_one)]
    pub max_depth: usize,

    /// Minimum rows needed to split an internal node
    #[arg(
        long,
        default_value_t = DEFAULT_MIN_SAMPLES_SPLIT,
        value_parser = validate_min_samples_split
    )]
    pub min_samples_split: usize,

    /// Minimum rows in each leaf
    #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES_LEAF, value_parser = validate_at_least_one)]
    pub min_samples_leaf: usize,

    /// Seed for the train/test split, bootstrap sampling and feature sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation (0.0 to 1.0, exclusive)
    #[arg(long, default_value = "0.2", value_parser = validate_test_size)]
    pub test_size: f64,
}

impl ForestArgs {
    /// Training configuration described by these arguments
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            forest: ForestConfig {
                n_trees: self.n_trees,
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
                seed: self.seed,
            },
            test_size: self.test_size,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub forest: ForestArgs,

    /// Number of most important features to show
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Write the training report to this JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub forest: ForestArgs,

    /// A single record as a JSON object, e.g. '{"MonthlyIncome": 1200, "OverTime": "Yes"}'
    #[arg(long, conflicts_with = "records", required_unless_present = "records")]
    pub record: Option<String>,

    /// JSON file holding one record object or an array of record objects
    #[arg(long)]
    pub records: Option<PathBuf>,
}

/// Validator for counts that must be positive
fn validate_at_least_one(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid non-negative integer", s))?;

    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for min_samples_split parameter
fn validate_min_samples_split(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid non-negative integer", s))?;

    if value < 2 {
        Err(format!("min_samples_split must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_test_size() {
        assert_eq!(validate_test_size("0.25"), Ok(0.25));
        assert!(validate_test_size("0").is_err());
        assert!(validate_test_size("1.0").is_err());
        assert!(validate_test_size("abc").is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert_eq!(validate_at_least_one("3"), Ok(3));
        assert!(validate_at_least_one("0").is_err());
        assert!(validate_min_samples_split("1").is_err());
        assert_eq!(validate_min_samples_split("2"), Ok(2));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
