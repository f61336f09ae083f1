//! CLI module - argument parsing, record input and commands

pub mod args;
pub mod predict;
pub mod prompts;
pub mod records;
pub mod train;

pub use args::{Cli, Commands, DataArgs, ForestArgs, PredictArgs, TrainArgs};
pub use predict::run_predict;
pub use prompts::*;
pub use records::*;
pub use train::run_train;
