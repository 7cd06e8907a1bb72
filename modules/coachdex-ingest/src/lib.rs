pub mod brightdata;
pub mod error;
pub mod hasdata;
pub mod ingest;
pub mod normalize;
pub mod provider;
pub mod rehost;
pub mod traits;

pub use brightdata::BrightDataSource;
pub use error::{IngestError, Result};
pub use hasdata::HasDataSource;
pub use ingest::Ingestor;
pub use provider::provider_from_config;
pub use traits::ProfileSource;
