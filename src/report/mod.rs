//! Report module - training summary display and JSON export

mod summary;
mod training_export;

pub use summary::*;
pub use training_export::*;
