//! Shared test utilities and fixture generators

#![allow(dead_code)]

use attrition::pipeline::{Record, Scalar};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DEPARTMENTS: [&str; 3] = ["Sales", "Research & Development", "Human Resources"];

/// One synthetic employee row
#[derive(Debug, Clone)]
pub struct Employee {
    pub employee_number: i64,
    pub age: Option<i64>,
    pub monthly_income: f64,
    pub over_time: &'static str,
    pub department: &'static str,
    pub attrition: &'static str,
}

impl Employee {
    /// The row as an inference record (without the target)
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("EmployeeNumber".to_string(), Scalar::Int(self.employee_number));
        record.insert(
            "Age".to_string(),
            self.age.map(Scalar::Int).unwrap_or(Scalar::Null),
        );
        record.insert("MonthlyIncome".to_string(), Scalar::Float(self.monthly_income));
        record.insert("OverTime".to_string(), Scalar::from(self.over_time));
        record.insert("Department".to_string(), Scalar::from(self.department));
        record
    }
}

/// Generate employees where low income and overtime drive attrition.
///
/// Attrition is "Yes" when income is below 2500, or below 5000 with
/// overtime. Department and Age are unrelated to the outcome; every 17th
/// Age is missing.
pub fn generate_employees(rows: usize, seed: u64) -> Vec<Employee> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..rows)
        .map(|i| {
            let monthly_income = rng.gen_range(1000.0..15000.0f64).round();
            let over_time = if rng.gen_bool(0.3) { "Yes" } else { "No" };
            let department = DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            let age = rng.gen_range(20..60i64);

            let leaves = monthly_income < 2500.0 || (monthly_income < 5000.0 && over_time == "Yes");

            Employee {
                employee_number: i as i64 + 1,
                age: if i % 17 == 5 { None } else { Some(age) },
                monthly_income,
                over_time,
                department,
                attrition: if leaves { "Yes" } else { "No" },
            }
        })
        .collect()
}

/// Build the attrition DataFrame for a set of employees
pub fn employees_dataframe(employees: &[Employee]) -> DataFrame {
    df! {
        "EmployeeNumber" => employees.iter().map(|e| e.employee_number).collect::<Vec<_>>(),
        "Age" => employees.iter().map(|e| e.age).collect::<Vec<_>>(),
        "MonthlyIncome" => employees.iter().map(|e| e.monthly_income).collect::<Vec<_>>(),
        "OverTime" => employees.iter().map(|e| e.over_time).collect::<Vec<_>>(),
        "Department" => employees.iter().map(|e| e.department).collect::<Vec<_>>(),
        "Attrition" => employees.iter().map(|e| e.attrition).collect::<Vec<_>>(),
    }
    .unwrap()
}

/// The 200-row synthetic attrition table used by the end-to-end tests
pub fn create_attrition_dataframe() -> DataFrame {
    employees_dataframe(&generate_employees(200, 7))
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Build a record from `(column, value)` pairs
pub fn record(pairs: &[(&str, Scalar)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
