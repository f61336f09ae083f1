//! Attrition: Employee Attrition Prediction CLI Tool
//!
//! Trains a random forest on an HR dataset, reports how well it does and
//! predicts attrition for individual employee records.

use anyhow::Result;
use clap::Parser;

use attrition::cli::{run_predict, run_train, Cli, Commands};
use attrition::utils::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Predict(args) => run_predict(args),
    }
}
