//! Organization spreadsheet enrichment from the Estonian business registry.
//!
//! Each data row is looked up on its registry profile page, its name is
//! normalized, and the row lands in the matching or non-matching table
//! depending on its EMTAK activity code.

pub mod app;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod server;
pub mod spreadsheet;
pub mod types;

pub use error::{EnrichError, Result};
pub use pipeline::{EnrichmentPipeline, ProcessedTables};
