//! Column model shared by all three encoders
//!
//! One campaign-name column, one column per stage in registry order, one
//! total-leads column.

use crate::analysis_core::{AnalysisResult, CampaignSummary, StageBreakdown, StageId};

/// Header labels: `Campaign`, one `<stage> (%)` per stage, `Total Leads`
pub(crate) fn header_labels(result: &AnalysisResult) -> Vec<String> {
    let mut labels = Vec::with_capacity(result.stages.len() + 2);
    labels.push("Campaign".to_string());
    for column in &result.stages {
        labels.push(format!("{} (%)", column.name));
    }
    labels.push("Total Leads".to_string());
    labels
}

/// Breakdown for one cell; a pair with no leads reads as zero
pub(crate) fn stage_cell(summary: &CampaignSummary, stage_id: StageId) -> StageBreakdown {
    summary
        .stages
        .get(&stage_id)
        .copied()
        .unwrap_or(StageBreakdown {
            lead_count: 0,
            percentage: 0.0,
        })
}
