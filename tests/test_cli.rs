//! Tests for CLI argument parsing and the attrition binary

mod common;

use assert_cmd::Command;
use attrition::cli::{Cli, Commands};
use clap::Parser;
use common::{create_attrition_dataframe, create_temp_csv};
use predicates::prelude::*;
use std::path::PathBuf;

#[test]
fn test_train_default_values() {
    let cli = Cli::parse_from(["attrition", "train", "-i", "hr.csv"]);

    let Commands::Train(args) = cli.command else {
        panic!("Expected train command");
    };
    assert_eq!(args.data.input, PathBuf::from("hr.csv"));
    assert_eq!(args.data.infer_schema_length, 10000);
    assert_eq!(args.top, 10);
    assert!(args.report.is_none());
    assert!(!args.no_confirm);

    let config = args.forest.train_config();
    assert_eq!(config.forest.n_trees, 100);
    assert_eq!(config.forest.max_depth, 10);
    assert_eq!(config.forest.min_samples_split, 5);
    assert_eq!(config.forest.min_samples_leaf, 2);
    assert_eq!(config.forest.seed, 42);
    assert_eq!(config.test_size, 0.2);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn test_train_custom_forest_options() {
    let cli = Cli::parse_from([
        "attrition",
        "-vv",
        "train",
        "-i",
        "hr.parquet",
        "--n-trees",
        "25",
        "--max-depth",
        "4",
        "--seed",
        "7",
        "--test-size",
        "0.3",
    ]);

    assert_eq!(cli.verbose, 2);
    let Commands::Train(args) = cli.command else {
        panic!("Expected train command");
    };
    let config = args.forest.train_config();
    assert_eq!(config.forest.n_trees, 25);
    assert_eq!(config.forest.max_depth, 4);
    assert_eq!(config.forest.seed, 7);
    assert_eq!(config.test_size, 0.3);
}

#[test]
fn test_invalid_options_rejected() {
    assert!(
        Cli::try_parse_from(["attrition", "train", "-i", "a.csv", "--test-size", "1.5"]).is_err()
    );
    assert!(Cli::try_parse_from(["attrition", "train", "-i", "a.csv", "--n-trees", "0"]).is_err());
    assert!(
        Cli::try_parse_from(["attrition", "train", "-i", "a.csv", "--min-samples-split", "1"])
            .is_err()
    );
    assert!(Cli::try_parse_from(["attrition", "train"]).is_err());
}

#[test]
fn test_predict_requires_exactly_one_record_source() {
    assert!(Cli::try_parse_from(["attrition", "predict", "-i", "a.csv"]).is_err());
    assert!(Cli::try_parse_from([
        "attrition",
        "predict",
        "-i",
        "a.csv",
        "--record",
        "{}",
        "--records",
        "r.json"
    ])
    .is_err());

    let cli = Cli::parse_from(["attrition", "predict", "-i", "a.csv", "--record", "{}"]);
    assert!(matches!(cli.command, Commands::Predict(_)));
}

#[test]
fn test_binary_train_writes_report() {
    let mut df = create_attrition_dataframe();
    let (dir, csv_path) = create_temp_csv(&mut df);
    let report_path = dir.path().join("report.json");

    Command::cargo_bin("attrition")
        .unwrap()
        .args(["train", "-i"])
        .arg(&csv_path)
        .args(["--n-trees", "20", "--no-confirm", "--report"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("TRAINING SUMMARY"))
        .stdout(predicate::str::contains("MonthlyIncome"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["statistics"]["rows"], 200);
    assert_eq!(json["metadata"]["target_column"], "Attrition");
    assert_eq!(json["metadata"]["config"]["forest"]["n_trees"], 20);
    assert!(json["accuracy"].as_f64().unwrap() > 0.5);
}

#[test]
fn test_binary_predict_unseen_department() {
    let mut df = create_attrition_dataframe();
    let (_dir, csv_path) = create_temp_csv(&mut df);

    Command::cargo_bin("attrition")
        .unwrap()
        .args(["predict", "-i"])
        .arg(&csv_path)
        .args([
            "--n-trees",
            "20",
            "--record",
            r#"{"MonthlyIncome": 1200, "OverTime": "Yes", "Department": "UNSEEN_DEPT"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yes"))
        .stdout(predicate::str::contains("Unknown"));
}

#[test]
fn test_binary_predict_reports_failed_record() {
    let mut df = create_attrition_dataframe();
    let (_dir, csv_path) = create_temp_csv(&mut df);

    Command::cargo_bin("attrition")
        .unwrap()
        .args(["predict", "-i"])
        .arg(&csv_path)
        .args([
            "--n-trees",
            "10",
            "--record",
            r#"[{"MonthlyIncome": 9000}, {"MonthlyIncome": "lots"}]"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 record(s) failed"));
}

#[test]
fn test_binary_rejects_dataset_without_target() {
    let mut df = create_attrition_dataframe().drop("Attrition").unwrap();
    let (_dir, csv_path) = create_temp_csv(&mut df);

    Command::cargo_bin("attrition")
        .unwrap()
        .args(["train", "-i"])
        .arg(&csv_path)
        .arg("--no-confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Attrition"));
}
