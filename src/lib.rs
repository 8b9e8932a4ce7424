//! leadflow - campaign stage-distribution analysis and export engine
//!
//! Computes, for each marketing campaign, what fraction of its leads sits in
//! each pipeline stage over an optional date window, and exports the
//! breakdown as CSV, XLSX, or PDF with rule-based anomaly highlighting.
//!
//! See `analysis_core` for the aggregation engine and `export` for the
//! renderers.

pub mod analysis_core;
pub mod config;
pub mod export;
