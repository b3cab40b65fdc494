pub mod csv_format;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod sample;
pub mod stats;

pub use filter::{filter, DatasetBounds, FilterCriteria, ResolvedCriteria};
pub use loader::DatasetLoader;
pub use merge::{merge, persist};
pub use model::Reading;
pub use stats::{summarize, FieldSummary, Summary};
