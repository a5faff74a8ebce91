//! # DiskView Backend Library
//!
//! DiskView walks a directory tree once and reports every non-empty file with
//! its size and normalized extension, plus a seven-bucket size histogram and
//! totals. The result is served as one JSON document over HTTP.
//!
//! ## Core Components
//!
//! - [`analyzer`]: the single-pass directory walk and per-file classification
//! - [`middleware`]: request validation (including the scan path validator) and security headers
//! - [`routes`]: HTTP endpoint handlers and router assembly
//! - [`config`]: layered application configuration
//! - [`error`]: HTTP error mapping
//! - [`metrics`]: process-wide counters
//! - [`state`]: shared application state
//! - [`types`]: the analysis result model and request DTOs

pub mod analyzer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

pub use analyzer::{analyze_directory, WalkError};
pub use middleware::validation::is_valid_scan_path;
