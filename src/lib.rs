pub mod config;
pub mod db;
pub mod error;

// Listing and suggestion engines over a pluggable store
pub mod query;
pub mod store;

// HTTP API
pub mod api;

// Command-line interface
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
