//! Bigfile Sweep - find, cache and page through large files
//!
//! This crate provides functionality for:
//! - Scanning a directory tree for files above a size threshold
//! - Persisting the threshold and caching scan results with a TTL
//! - Paginating and rendering the cached results
//! - Cached IP reputation lookups through a pluggable client

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod paginate;
pub mod reputation;
pub mod scanner;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use cache::TtlCache;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardView};
pub use error::{Result, SweepError};
pub use paginate::{paginate, Page};
pub use settings::{ConfigStore, ScanConfig, ThresholdUnit};
