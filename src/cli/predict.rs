//! The `predict` command

use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::cli::args::PredictArgs;
use crate::cli::records::{load_records, parse_records};
use crate::cli::train::load_and_train;
use crate::pipeline::{Prediction, TargetMapping};
use crate::utils::{print_banner, print_completion, print_config, print_step_header, print_warning};

/// Run the `predict` command
pub fn run_predict(args: &PredictArgs) -> Result<()> {
    let records = match (&args.record, &args.records) {
        (Some(json), _) => parse_records(json)?,
        (None, Some(path)) => load_records(path)?,
        (None, None) => bail!("Provide a record with --record or a file with --records"),
    };
    if records.is_empty() {
        bail!("No records to predict");
    }

    let config = args.forest.train_config();
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&args.data.input, &config);

    let (mut pipeline, _) = load_and_train(&args.data, config)?;

    print_step_header(3, "Predict");
    let mapping = TargetMapping::default();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Attrition").add_attribute(Attribute::Bold),
        Cell::new("Probability").add_attribute(Attribute::Bold),
        Cell::new("Confidence").add_attribute(Attribute::Bold),
    ]);

    let mut failures = 0usize;
    for (i, record) in records.iter().enumerate() {
        match pipeline.predict_one(record) {
            Ok(prediction) => table.add_row(prediction_row(i + 1, &prediction, &mapping)),
            Err(e) => {
                failures += 1;
                tracing::warn!(record = i + 1, error = %e, "Prediction failed");
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new("error").fg(Color::Red),
                    Cell::new(e.to_string()).fg(Color::Red),
                    Cell::new("-"),
                ])
            }
        };
    }

    println!();
    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    for fallback in pipeline.status().unknown_fallbacks {
        print_warning(&format!(
            "{} unseen value(s) in '{}' mapped to the Unknown category",
            fallback.count, fallback.column
        ));
    }

    if failures > 0 {
        bail!("{} of {} record(s) failed", failures, records.len());
    }

    print_completion(&format!(
        "Predicted {} record(s)",
        style(records.len()).bold()
    ));
    Ok(())
}

fn prediction_row(index: usize, prediction: &Prediction, mapping: &TargetMapping) -> Vec<Cell> {
    let color = if prediction.label == 1 {
        Color::Red
    } else {
        Color::Green
    };

    vec![
        Cell::new(index),
        Cell::new(mapping.label(prediction.label))
            .fg(color)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", prediction.probability)),
        Cell::new(format!("{:.4}", prediction.confidence)),
    ]
}
