//! SQLite access layer over the host CRM tables
//!
//! Reads `crm_lead`, `utm_campaign`, and `crm_stage` as a passive data
//! source. Translated name fields are resolved to a single display string
//! here, at the registry boundary - the engine and renderers only ever see
//! plain strings.

use super::model::{Campaign, CampaignId, Stage, StageId};
use super::window::DateWindow;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub enum StoreError {
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Lead count for one (campaign, stage) group within a window
///
/// `stage_id` is None for leads that carry no stage reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    pub campaign_id: CampaignId,
    pub stage_id: Option<StageId>,
    pub lead_count: i64,
}

/// One consistent point-in-time view of everything an analysis needs
#[derive(Debug)]
pub struct AnalysisSnapshot {
    pub campaigns: Vec<Campaign>,
    pub stages: Vec<Stage>,
    pub totals: HashMap<CampaignId, i64>,
    pub stage_counts: Vec<StageCount>,
}

/// SQLite lead store reader
pub struct LeadStore {
    pub(crate) conn: Connection,
    locale: String,
}

impl LeadStore {
    /// Open the host database and apply concurrency pragmas
    pub fn open(db_path: impl AsRef<Path>, locale: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        log::info!("📂 Lead store opened (locale: {})", locale);

        Ok(Self {
            conn,
            locale: locale.to_string(),
        })
    }

    /// Active campaigns ordered by resolved display name, ties by id
    pub fn active_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        query_campaigns(&self.conn, &self.locale)
    }

    /// All stages ordered by sequence, ties by id
    pub fn stages_by_sequence(&self) -> Result<Vec<Stage>, StoreError> {
        query_stages(&self.conn, &self.locale)
    }

    /// Read registries, per-campaign totals, and per-stage counts inside one
    /// transaction so the caller observes a single point-in-time view.
    pub fn analysis_snapshot(&mut self, window: &DateWindow) -> Result<AnalysisSnapshot, StoreError> {
        let tx = self.conn.transaction()?;

        let campaigns = query_campaigns(&tx, &self.locale)?;
        let stages = query_stages(&tx, &self.locale)?;
        let totals = query_campaign_totals(&tx, window)?;
        let stage_counts = query_stage_counts(&tx, window)?;

        tx.commit()?;

        Ok(AnalysisSnapshot {
            campaigns,
            stages,
            totals,
            stage_counts,
        })
    }
}

/// Resolve a possibly-translated name field to one display string
///
/// The host stores translated fields as a JSON object of locale → text.
/// Resolution: configured locale, else the first entry, else "Unknown".
/// Plain strings pass through untouched.
pub(crate) fn resolve_display_name(raw: &str, locale: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .get(locale)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| {
                map.values()
                    .next()
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Unknown".to_string()),
        _ => raw.to_string(),
    }
}

fn query_campaigns(conn: &Connection, locale: &str) -> Result<Vec<Campaign>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.active
         FROM utm_campaign c
         WHERE c.active = 1",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, bool>(2)?,
        ))
    })?;

    let mut campaigns = Vec::new();
    for row in rows {
        let (id, raw_name, active) = row?;
        campaigns.push(Campaign {
            id,
            name: resolve_display_name(&raw_name, locale),
            active,
        });
    }

    // Sort on the resolved name, not the raw column value
    campaigns.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    Ok(campaigns)
}

fn query_stages(conn: &Connection, locale: &str) -> Result<Vec<Stage>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.sequence
         FROM crm_stage s
         ORDER BY s.sequence, s.id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut stages = Vec::new();
    for row in rows {
        let (id, raw_name, sequence) = row?;
        stages.push(Stage {
            id,
            name: resolve_display_name(&raw_name, locale),
            sequence,
        });
    }

    Ok(stages)
}

/// Append inclusive create_date predicates for the window bounds
fn window_predicate(window: &DateWindow, params: &mut Vec<i64>) -> String {
    let mut condition = String::new();
    if let Some(from) = window.date_from {
        condition.push_str(" AND l.create_date >= ?");
        params.push(from);
    }
    if let Some(to) = window.date_to {
        condition.push_str(" AND l.create_date <= ?");
        params.push(to);
    }
    condition
}

fn query_campaign_totals(
    conn: &Connection,
    window: &DateWindow,
) -> Result<HashMap<CampaignId, i64>, StoreError> {
    let mut params: Vec<i64> = Vec::new();
    let condition = window_predicate(window, &mut params);

    let sql = format!(
        "SELECT l.campaign_id, COUNT(l.id) AS total_leads
         FROM crm_lead l
         WHERE l.campaign_id IS NOT NULL AND l.active = 1{}
         GROUP BY l.campaign_id",
        condition
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut totals = HashMap::new();
    for row in rows {
        let (campaign_id, total) = row?;
        totals.insert(campaign_id, total);
    }

    Ok(totals)
}

fn query_stage_counts(
    conn: &Connection,
    window: &DateWindow,
) -> Result<Vec<StageCount>, StoreError> {
    let mut params: Vec<i64> = Vec::new();
    let condition = window_predicate(window, &mut params);

    let sql = format!(
        "SELECT l.campaign_id, l.stage_id, COUNT(l.id) AS lead_count
         FROM crm_lead l
         WHERE l.campaign_id IS NOT NULL AND l.active = 1{}
         GROUP BY l.campaign_id, l.stage_id
         ORDER BY l.campaign_id, l.stage_id",
        condition
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
        Ok(StageCount {
            campaign_id: row.get(0)?,
            stage_id: row.get(1)?,
            lead_count: row.get(2)?,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }

    Ok(counts)
}
