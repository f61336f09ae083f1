//! Training summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::TrainResult;

/// Terminal summary of a training run
#[derive(Debug)]
pub struct TrainingSummary<'a> {
    result: &'a TrainResult,
    top_n: usize,
}

impl<'a> TrainingSummary<'a> {
    pub fn new(result: &'a TrainResult, top_n: usize) -> Self {
        Self { result, top_n }
    }

    pub fn display(&self) {
        self.display_overview();
        self.display_classification_report();
        self.display_feature_importance();
        self.display_imputed_columns();
    }

    fn display_overview(&self) {
        let result = self.result;
        print_section_header("📋", "TRAINING SUMMARY");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows x Columns"),
            Cell::new(format!("{} x {}", result.data_shape.0, result.data_shape.1)),
        ]);
        table.add_row(vec![
            Cell::new("🧮 Features"),
            Cell::new(format!(
                "{} ({} categorical)",
                result.schema.len(),
                result.schema.categorical_count()
            )),
        ]);
        table.add_row(vec![
            Cell::new("✂️  Train / Test"),
            Cell::new(format!("{} / {}", result.train_rows, result.test_rows)),
        ]);
        table.add_row(vec![
            Cell::new("🎯 Attrition Rate"),
            Cell::new(format!(
                "{:.1}% ({} of {})",
                attrition_rate(result) * 100.0,
                result.class_counts.events,
                result.class_counts.total()
            )),
        ]);

        let baseline = result.class_counts.majority_baseline();
        table.add_row(vec![
            Cell::new("📏 Majority Baseline"),
            Cell::new(format!("{:.4}", baseline)),
        ]);
        table.add_row(vec![
            Cell::new("✅ Test Accuracy"),
            Cell::new(format!("{:.4}", result.accuracy))
                .fg(accuracy_color(result.accuracy, baseline))
                .add_attribute(Attribute::Bold),
        ]);

        print_indented(&table);
    }

    fn display_classification_report(&self) {
        let report = &self.result.classification_report;
        print_section_header("📊", "CLASSIFICATION REPORT");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1-score").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);

        for class in &report.classes {
            table.add_row(vec![
                Cell::new(&class.label),
                Cell::new(format!("{:.2}", class.precision)),
                Cell::new(format!("{:.2}", class.recall)),
                Cell::new(format!("{:.2}", class.f1_score)),
                Cell::new(class.support),
            ]);
        }

        let averages = [
            ("macro avg", &report.macro_avg),
            ("weighted avg", &report.weighted_avg),
        ];
        for (name, avg) in averages {
            table.add_row(vec![
                Cell::new(name).fg(Color::Cyan),
                Cell::new(format!("{:.2}", avg.precision)),
                Cell::new(format!("{:.2}", avg.recall)),
                Cell::new(format!("{:.2}", avg.f1_score)),
                Cell::new(avg.support),
            ]);
        }

        print_indented(&table);

        let [[tn, fp], [fn_, tp]] = report.confusion_matrix;
        println!();
        println!(
            "      {} TN {}  FP {}  FN {}  TP {}",
            style("Confusion matrix:").dim(),
            style(tn).green(),
            style(fp).red(),
            style(fn_).red(),
            style(tp).green()
        );
    }

    fn display_feature_importance(&self) {
        let ranked = &self.result.feature_importance;
        if ranked.is_empty() || self.top_n == 0 {
            return;
        }

        print_section_header("🌲", "TOP FEATURES");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Feature").add_attribute(Attribute::Bold),
            Cell::new("Importance").add_attribute(Attribute::Bold),
        ]);

        for (rank, feature) in ranked.iter().take(self.top_n).enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(&feature.feature),
                Cell::new(format!("{:.4}", feature.importance)).fg(Color::Yellow),
            ]);
        }

        print_indented(&table);

        if ranked.len() > self.top_n {
            println!(
                "      {}",
                style(format!("... and {} more", ranked.len() - self.top_n)).dim()
            );
        }
    }

    fn display_imputed_columns(&self) {
        let imputed = &self.result.imputed;
        if imputed.is_empty() {
            return;
        }

        print_section_header("📝", "IMPUTED COLUMNS");
        for column in imputed {
            println!(
                "        {} {} {}",
                style("•").dim(),
                column.column,
                style(format!(
                    "({} filled with {} = {}, {:.1}% missing)",
                    column.filled,
                    column.strategy,
                    column.fill_value,
                    column.missing_ratio * 100.0
                ))
                .dim()
            );
        }
    }
}

fn attrition_rate(result: &TrainResult) -> f64 {
    let total = result.class_counts.total();
    if total == 0 {
        0.0
    } else {
        result.class_counts.events as f64 / total as f64
    }
}

fn accuracy_color(accuracy: f64, baseline: f64) -> Color {
    if accuracy > baseline {
        Color::Green
    } else if accuracy == baseline {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn print_section_header(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

// Indent the table
fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
