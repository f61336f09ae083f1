//! Pipeline module - preprocessing, training and inference

pub mod encoder;
pub mod error;
pub mod forest;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod model;
pub mod preprocess;
pub mod record;
pub mod schema;
pub mod split;
pub mod target;

pub use encoder::*;
pub use error::*;
pub use forest::{ForestConfig, RandomForest};
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use model::*;
pub use preprocess::*;
pub use record::*;
pub use schema::*;
pub use split::*;
pub use target::*;
