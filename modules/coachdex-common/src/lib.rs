pub mod classify;
pub mod config;
pub mod types;

pub use classify::{detect_niche, is_german_account};
pub use config::Config;
pub use types::*;
