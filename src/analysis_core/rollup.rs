//! Cached rollup - unwindowed snapshot of the campaign/stage aggregates
//!
//! Denormalized rows rebuilt wholesale from the live lead table, kept warm
//! for unwindowed/legacy consumers. Windowed analysis never reads it.

use super::model::{CampaignId, StageId};
use super::store::{LeadStore, StoreError};

/// One denormalized rollup row, as materialized at refresh time
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRow {
    pub campaign_id: CampaignId,
    pub stage_id: Option<StageId>,
    pub create_date: i64,
    pub lead_count: i64,
    pub total_leads: i64,
    pub percentage: Option<f64>,
}

/// Rebuild query. The NULLIF guard keeps a zero campaign total from
/// producing a division error; the ORDER BY makes repeated rebuilds over
/// unchanged data byte-identical.
const REBUILD_SQL: &str = "
    INSERT INTO campaign_analysis_rollup
        (campaign_id, stage_id, create_date, lead_count, total_leads, percentage)
    SELECT
        l.campaign_id,
        l.stage_id,
        l.create_date,
        COUNT(l.id) AS lead_count,
        camp_total.total_count AS total_leads,
        (COUNT(l.id) * 100.0 / NULLIF(camp_total.total_count, 0)) AS percentage
    FROM crm_lead l
    JOIN
        (SELECT campaign_id, COUNT(id) AS total_count
         FROM crm_lead
         WHERE campaign_id IS NOT NULL AND active = 1
         GROUP BY campaign_id) AS camp_total
      ON camp_total.campaign_id = l.campaign_id
    WHERE l.campaign_id IS NOT NULL AND l.active = 1
    GROUP BY l.campaign_id, l.stage_id, l.create_date, camp_total.total_count
    ORDER BY l.campaign_id, l.stage_id, l.create_date";

impl LeadStore {
    /// Create the rollup table if it does not exist yet
    pub fn ensure_rollup_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS campaign_analysis_rollup (
                campaign_id INTEGER NOT NULL,
                stage_id INTEGER,
                create_date INTEGER NOT NULL,
                lead_count INTEGER NOT NULL,
                total_leads INTEGER NOT NULL,
                percentage REAL
            )",
        )?;
        Ok(())
    }

    /// Replace the rollup with a fresh snapshot of the live lead table
    ///
    /// Delete and re-insert happen in one transaction: concurrent readers
    /// see either the old or the new snapshot, never a partial one. On
    /// failure the transaction rolls back and the prior snapshot stays
    /// valid.
    pub fn rebuild_rollup(&mut self) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM campaign_analysis_rollup", [])?;
        let inserted = tx.execute(REBUILD_SQL, [])?;
        tx.commit()?;

        log::debug!("📊 Rollup rebuilt: {} rows", inserted);
        Ok(inserted)
    }

    /// Read the current rollup snapshot, in its materialized order
    pub fn rollup_rows(&self) -> Result<Vec<RollupRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT campaign_id, stage_id, create_date, lead_count, total_leads, percentage
             FROM campaign_analysis_rollup
             ORDER BY campaign_id, stage_id, create_date",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RollupRow {
                campaign_id: row.get(0)?,
                stage_id: row.get(1)?,
                create_date: row.get(2)?,
                lead_count: row.get(3)?,
                total_leads: row.get(4)?,
                percentage: row.get(5)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::test_support::*;
    use super::super::store::LeadStore;
    use rusqlite::Connection;
    use tempfile::tempdir;

    fn setup_store() -> (tempfile::TempDir, LeadStore) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("crm.db");

        let conn = Connection::open(&db_path).unwrap();
        create_crm_schema(&conn);
        drop(conn);

        let store = LeadStore::open(&db_path, "en_US").unwrap();
        store.ensure_rollup_schema().unwrap();
        (dir, store)
    }

    #[test]
    fn test_rebuild_materializes_counts_and_percentages() {
        let (_dir, mut store) = setup_store();
        insert_campaign(&store.conn, 1, "Spring", true);
        insert_stage(&store.conn, 1, "New", 1);
        insert_stage(&store.conn, 2, "Won", 2);

        insert_lead(&store.conn, Some(1), Some(1), 1000, true);
        insert_lead(&store.conn, Some(1), Some(1), 1000, true);
        insert_lead(&store.conn, Some(1), Some(2), 1000, true);
        insert_lead(&store.conn, Some(1), Some(1), 1000, false); // inactive, excluded

        let inserted = store.rebuild_rollup().unwrap();
        assert_eq!(inserted, 2);

        let rows = store.rollup_rows().unwrap();
        assert_eq!(rows.len(), 2);

        let new_row = rows.iter().find(|r| r.stage_id == Some(1)).unwrap();
        assert_eq!(new_row.lead_count, 2);
        assert_eq!(new_row.total_leads, 3);
        assert!((new_row.percentage.unwrap() - 200.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (_dir, mut store) = setup_store();
        insert_campaign(&store.conn, 1, "Spring", true);
        insert_stage(&store.conn, 1, "New", 1);
        insert_lead(&store.conn, Some(1), Some(1), 1000, true);
        insert_lead(&store.conn, Some(1), Some(1), 2000, true);

        store.rebuild_rollup().unwrap();
        let first = store.rollup_rows().unwrap();

        store.rebuild_rollup().unwrap();
        let second = store.rollup_rows().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_replaces_prior_snapshot() {
        let (_dir, mut store) = setup_store();
        insert_campaign(&store.conn, 1, "Spring", true);
        insert_stage(&store.conn, 1, "New", 1);
        insert_lead(&store.conn, Some(1), Some(1), 1000, true);

        store.rebuild_rollup().unwrap();
        assert_eq!(store.rollup_rows().unwrap().len(), 1);

        insert_lead(&store.conn, Some(1), Some(1), 5000, true);
        store.rebuild_rollup().unwrap();

        let rows = store.rollup_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.total_leads == 2));
    }

    #[test]
    fn test_failed_rebuild_keeps_prior_snapshot() {
        let (_dir, mut store) = setup_store();
        insert_campaign(&store.conn, 1, "Spring", true);
        insert_stage(&store.conn, 1, "New", 1);
        insert_lead(&store.conn, Some(1), Some(1), 1000, true);

        store.rebuild_rollup().unwrap();
        let before = store.rollup_rows().unwrap();

        // Make the source table unreadable so the rebuild fails mid-flight
        store
            .conn
            .execute("ALTER TABLE crm_lead RENAME TO crm_lead_gone", [])
            .unwrap();
        assert!(store.rebuild_rollup().is_err());

        assert_eq!(store.rollup_rows().unwrap(), before);
    }
}
