//! Configuration loading for the EA rate tables and workflow validation.
//!
//! # Example
//!
//! ```no_run
//! use timesheet_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ea_schedule1").unwrap();
//! println!("Loaded agreement: {}", config.agreement().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AgreementMetadata, EngineConfig, HoursBounds, RateRule, RateTable, ValidationConfig,
};
