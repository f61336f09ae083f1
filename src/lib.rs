//! Attrition: Employee Attrition Prediction Library
//!
//! Trains a random forest on HR records and predicts attrition for single
//! employee records, with the preprocessing contract (imputation, label
//! encoding, unseen-category fallback) kept alongside the model.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
