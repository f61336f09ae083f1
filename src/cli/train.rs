//! The `train` command

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use crate::cli::args::{DataArgs, TrainArgs};
use crate::cli::prompts::confirm_overwrite;
use crate::pipeline::{
    analyze_missing_values, estimated_size_mb, load_dataset, AttritionPipeline, TrainConfig,
    TrainResult,
};
use crate::report::{export_training_report, TrainingSummary};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

/// Load the dataset and train a pipeline on it, reporting progress as steps
pub(crate) fn load_and_train(
    data: &DataArgs,
    config: TrainConfig,
) -> Result<(AttritionPipeline, TrainResult)> {
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(&data.input, data.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());
    println!("      Estimated memory: {:.2} MB", estimated_size_mb(&df));

    let missing = analyze_missing_values(&df)?;
    let with_missing = missing.iter().filter(|(_, ratio)| *ratio > 0.0).count();
    if with_missing > 0 {
        print_count("columns with missing values", with_missing, Some("(will be imputed)"));
    }
    print_step_time(step_start.elapsed());

    print_step_header(2, "Train Random Forest");
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Growing {} trees...", config.forest.n_trees));
    let mut pipeline = AttritionPipeline::with_config(config);
    let result = match pipeline.train(&df) {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("Training failed");
        }
    };
    if result.accuracy > result.class_counts.majority_baseline() {
        finish_with_success(&spinner, "Model trained");
    } else {
        finish_with_warning(&spinner, "Model trained but does not beat the majority baseline");
    }
    print_info(&format!(
        "Accuracy {:.4} on {} held-out rows",
        result.accuracy, result.test_rows
    ));
    print_step_time(step_start.elapsed());

    Ok((pipeline, result))
}

/// Run the `train` command
pub fn run_train(args: &TrainArgs) -> Result<()> {
    let config = args.forest.train_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&args.data.input, &config);

    let (_, result) = load_and_train(&args.data, config.clone())?;

    TrainingSummary::new(&result, args.top).display();

    if let Some(report_path) = &args.report {
        write_report(&result, report_path, &args.data.input, &config, args.no_confirm)?;
    }

    print_completion("Training complete!");
    Ok(())
}

fn write_report(
    result: &TrainResult,
    report_path: &Path,
    input: &Path,
    config: &TrainConfig,
    no_confirm: bool,
) -> Result<()> {
    if report_path.exists() && !no_confirm && !confirm_overwrite(report_path)? {
        print_warning("Training report not written");
        return Ok(());
    }

    println!();
    export_training_report(result, report_path, &input.display().to_string(), config)?;
    print_success(&format!("Training report saved to {}", report_path.display()));
    Ok(())
}
