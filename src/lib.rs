//! Seeds a BirdBook microservices deployment with demo data.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod fixtures;
pub mod logging;
pub mod retry;
pub mod types;

// Application layer (use cases and the ports they need) and the adapters behind them
pub mod app;
pub mod infra;

pub use app::report::SeedReport;
pub use config::SeedConfig;
pub use error::{Result, SeedError};
