pub mod archetype;
pub mod config;
pub mod csv_ingest;
pub mod error;
pub mod explorer;
pub mod features;
pub mod insight;
pub mod kmeans;
pub mod metrics;
pub mod profile;
pub mod record;
pub mod schema;
pub mod session;

pub use archetype::Archetype;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use record::{RawRecord, RawValue};
pub use session::{AnalysisSession, AnalysisSnapshot, Comparison, run_analysis};
