pub mod config;
pub mod error;
pub mod logging;

pub use config::EngineConfig;
pub use error::{Result, ScanError};
