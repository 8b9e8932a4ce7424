//! Analysis Core - Campaign Stage-Distribution Engine
//!
//! This module computes, for an optional date window, how the leads of each
//! marketing campaign are distributed across the pipeline stages.
//!
//! # Architecture
//!
//! ```text
//! SQLite CRM tables → LeadStore (transactional snapshot)
//!     ↓
//! AnalysisEngine (window filter, per-campaign totals, per-stage counts)
//!     ↓
//! AnalysisResult (campaigns × stages percentage breakdown)
//!     ↓
//! export renderers (CSV / XLSX / PDF)
//! ```
//!
//! The engine also maintains a cached rollup table - an unwindowed snapshot
//! of the same aggregates, rebuilt wholesale for fast-path consumers. The
//! rollup is never consulted for windowed answers; windowed queries always
//! recompute against the live tables.

pub mod engine;
pub mod model;
pub mod rollup;
pub mod store;
pub mod window;

pub use engine::{AnalysisEngine, AnalysisError};
pub use model::{
    AnalysisResult, Campaign, CampaignId, CampaignSummary, Stage, StageBreakdown, StageColumn,
    StageId,
};
pub use rollup::RollupRow;
pub use store::{AnalysisSnapshot, LeadStore, StoreError};
pub use window::{DateWindow, WindowError};
