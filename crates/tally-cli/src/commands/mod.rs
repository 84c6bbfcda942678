//! CLI command implementations
//!
//! Commands are organized by pipeline stage:
//! - `pipeline` - Shared utilities (config resolution, load + clean, JSON output)
//! - `data` - Raw-data profiling and cleaned-data export
//! - `reports` - Single report commands and their console tables
//! - `analyze` - Full analysis run and chart rendering

pub mod analyze;
pub mod data;
pub mod pipeline;
pub mod reports;

// Re-export command functions for main.rs
pub use analyze::*;
pub use data::*;
pub use pipeline::*;
pub use reports::*;

// Same label shortening the charts use
pub use tally_core::truncate;
