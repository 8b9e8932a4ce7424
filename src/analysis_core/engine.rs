//! Windowed aggregation engine
//!
//! Owns one `LeadStore` and, through it, exactly one cached rollup. The
//! rollup is refreshed opportunistically; windowed analysis always
//! recomputes against the live tables.

use super::model::{AnalysisResult, CampaignSummary, StageBreakdown, StageColumn, StageId};
use super::store::{LeadStore, StoreError};
use super::window::{DateWindow, WindowError};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug)]
pub enum AnalysisError {
    Window(WindowError),
    Store(StoreError),
}

impl From<WindowError> for AnalysisError {
    fn from(err: WindowError) -> Self {
        AnalysisError::Window(err)
    }
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        AnalysisError::Store(err)
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Window(e) => write!(f, "Window error: {}", e),
            AnalysisError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Campaign stage-distribution engine
pub struct AnalysisEngine {
    store: LeadStore,
}

impl AnalysisEngine {
    /// Wrap a lead store; creates the rollup table if missing
    pub fn new(store: LeadStore) -> Result<Self, StoreError> {
        store.ensure_rollup_schema()?;
        Ok(Self { store })
    }

    /// Rebuild the cached rollup from the current lead table
    ///
    /// A failure leaves the prior snapshot valid; callers treat it as a
    /// soft warning, not a reason to abort their larger operation.
    pub fn refresh_rollup(&mut self) -> Result<usize, StoreError> {
        self.store.rebuild_rollup()
    }

    /// Current rollup snapshot, for unwindowed/legacy consumers
    pub fn rollup_rows(&self) -> Result<Vec<super::rollup::RollupRow>, StoreError> {
        self.store.rollup_rows()
    }

    /// Compute the stage distribution of every active campaign's leads
    /// within the inclusive `[date_from, date_to]` window (unix seconds;
    /// absent bounds are unconstrained).
    ///
    /// An inverted range is rejected before any query runs. Campaigns with
    /// no leads in the window are absent from the result. Leads whose stage
    /// is missing from the registry count toward the campaign total but get
    /// no breakdown entry, so per-stage percentages may sum below 100 - the
    /// shortfall stays observable.
    pub fn compute_analysis(
        &mut self,
        date_from: Option<i64>,
        date_to: Option<i64>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let window = DateWindow::new(date_from, date_to)?;

        // Any windowed query keeps the unwindowed rollup warm as a side
        // effect. The analysis below never reads it, so a failed refresh
        // only costs the warning.
        if window.has_filter() {
            if let Err(e) = self.store.rebuild_rollup() {
                log::warn!("⚠️ Rollup refresh failed, keeping previous snapshot: {}", e);
            }
        }

        let snapshot = self.store.analysis_snapshot(&window)?;

        let stages: Vec<StageColumn> = snapshot
            .stages
            .iter()
            .map(|s| StageColumn {
                id: s.id,
                name: s.name.clone(),
            })
            .collect();
        let known_stages: HashSet<StageId> = stages.iter().map(|c| c.id).collect();

        let mut campaigns = BTreeMap::new();
        for campaign in &snapshot.campaigns {
            if let Some(&total) = snapshot.totals.get(&campaign.id) {
                if total > 0 {
                    campaigns.insert(
                        campaign.id,
                        CampaignSummary {
                            name: campaign.name.clone(),
                            total_leads: total,
                            stages: HashMap::new(),
                        },
                    );
                }
            }
        }

        for count in &snapshot.stage_counts {
            let stage_id = match count.stage_id {
                Some(id) if known_stages.contains(&id) => id,
                // Null or orphaned stage: already in the total, no breakdown
                _ => continue,
            };
            if let Some(summary) = campaigns.get_mut(&count.campaign_id) {
                let percentage = if summary.total_leads > 0 {
                    count.lead_count as f64 * 100.0 / summary.total_leads as f64
                } else {
                    0.0
                };
                summary.stages.insert(
                    stage_id,
                    StageBreakdown {
                        lead_count: count.lead_count,
                        percentage,
                    },
                );
            }
        }

        Ok(AnalysisResult { campaigns, stages })
    }
}
