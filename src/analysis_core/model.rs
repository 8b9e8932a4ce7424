//! Data model shared between the analysis engine and the export renderers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type CampaignId = i64;
pub type StageId = i64;

/// A marketing campaign from the campaign registry
///
/// The name is already locale-resolved by the store; identity is the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub active: bool,
}

/// A pipeline stage from the stage registry
///
/// `sequence` defines display order; ties break by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub sequence: i64,
}

/// Lead count and percentage for one (campaign, stage) pair within a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageBreakdown {
    pub lead_count: i64,
    pub percentage: f64,
}

/// One campaign's windowed totals and per-stage breakdown
///
/// Stages missing from the registry contribute to `total_leads` but have no
/// entry in `stages`, so per-stage counts may sum to less than the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub name: String,
    pub total_leads: i64,
    pub stages: HashMap<StageId, StageBreakdown>,
}

/// A stage column of the result, in registry display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageColumn {
    pub id: StageId,
    pub name: String,
}

/// Immutable snapshot exchanged between the engine and the renderers
///
/// `stages` carries the registry order (sequence, ties by id) and defines
/// the column order for any downstream rendering. Campaigns with no leads
/// in the window are absent entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub campaigns: BTreeMap<CampaignId, CampaignSummary>,
    pub stages: Vec<StageColumn>,
}

impl AnalysisResult {
    /// Campaigns in render order: by display name, ties by id
    pub fn ordered_campaigns(&self) -> Vec<(CampaignId, &CampaignSummary)> {
        let mut rows: Vec<_> = self.campaigns.iter().map(|(id, s)| (*id, s)).collect();
        rows.sort_by(|a, b| a.1.name.cmp(&b.1.name).then(a.0.cmp(&b.0)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, total: i64) -> CampaignSummary {
        CampaignSummary {
            name: name.to_string(),
            total_leads: total,
            stages: HashMap::new(),
        }
    }

    #[test]
    fn test_ordered_campaigns_by_name_then_id() {
        let mut campaigns = BTreeMap::new();
        campaigns.insert(3, summary("Winter", 10));
        campaigns.insert(1, summary("Autumn", 5));
        campaigns.insert(2, summary("Autumn", 7));

        let result = AnalysisResult {
            campaigns,
            stages: Vec::new(),
        };

        let ordered = result.ordered_campaigns();
        let ids: Vec<CampaignId> = ordered.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let mut stages = HashMap::new();
        stages.insert(
            7,
            StageBreakdown {
                lead_count: 3,
                percentage: 30.0,
            },
        );

        let mut campaigns = BTreeMap::new();
        campaigns.insert(
            1,
            CampaignSummary {
                name: "Spring".to_string(),
                total_leads: 10,
                stages,
            },
        );

        let result = AnalysisResult {
            campaigns,
            stages: vec![StageColumn {
                id: 7,
                name: "New".to_string(),
            }],
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
