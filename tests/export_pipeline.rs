//! End-to-end tests for the analysis and export pipeline
//!
//! Seeds a real SQLite database with CRM tables, runs the aggregation
//! engine, and checks the rendered outputs against the documented column
//! model and formatting contracts.

use chrono::NaiveDate;
use leadflow::analysis_core::{AnalysisEngine, LeadStore};
use leadflow::export::{CsvExporter, ExportFormat, ExportWriter};
use rusqlite::{params, Connection};
use tempfile::tempdir;

fn setup_crm_db(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE utm_campaign (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE crm_stage (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            sequence INTEGER NOT NULL
        );
        CREATE TABLE crm_lead (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            campaign_id INTEGER,
            stage_id INTEGER,
            create_date INTEGER NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );",
    )
    .unwrap();
}

fn insert_leads(conn: &Connection, campaign_id: i64, stage_id: i64, count: usize) {
    for _ in 0..count {
        conn.execute(
            "INSERT INTO crm_lead (campaign_id, stage_id, create_date, active)
             VALUES (?1, ?2, 1000, 1)",
            params![campaign_id, stage_id],
        )
        .unwrap();
    }
}

/// One campaign, 100 leads: 30 in S_JUNK (seq 1), 70 in S_OK (seq 2)
fn seed_junk_scenario(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO utm_campaign (id, name, active) VALUES (1, 'C1', 1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO crm_stage (id, name, sequence) VALUES (1, 'S_JUNK', 1), (2, 'S_OK', 2)",
        [],
    )
    .unwrap();
    insert_leads(&conn, 1, 1, 30);
    insert_leads(&conn, 1, 2, 70);
}

#[test]
fn test_csv_output_matches_column_model() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("crm.db");
    setup_crm_db(&db_path);
    seed_junk_scenario(&db_path);

    let store = LeadStore::open(&db_path, "en_US").unwrap();
    let mut engine = AnalysisEngine::new(store).unwrap();
    let result = engine.compute_analysis(None, None).unwrap();

    let bytes = CsvExporter::new().render(&result).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Campaign,S_JUNK (%),S_OK (%),Total Leads"
    );
    assert_eq!(lines.next().unwrap(), "C1,30.00%,70.00%,100");
}

#[test]
fn test_csv_roundtrip_recovers_values() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("crm.db");
    setup_crm_db(&db_path);
    seed_junk_scenario(&db_path);

    let store = LeadStore::open(&db_path, "en_US").unwrap();
    let mut engine = AnalysisEngine::new(store).unwrap();
    let result = engine.compute_analysis(None, None).unwrap();

    let bytes = CsvExporter::new().render(&result).unwrap();
    let mut reader = csv::Reader::from_reader(bytes.as_slice());

    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("Campaign"));
    // Stage names recovered from the "<name> (%)" headers
    assert_eq!(headers.get(1), Some("S_JUNK (%)"));
    assert_eq!(headers.get(2), Some("S_OK (%)"));

    let records: Vec<csv::StringRecord> =
        reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);

    let row = &records[0];
    assert_eq!(row.get(0), Some("C1"));
    let junk_pct: f64 = row.get(1).unwrap().trim_end_matches('%').parse().unwrap();
    let ok_pct: f64 = row.get(2).unwrap().trim_end_matches('%').parse().unwrap();
    let total: i64 = row.get(3).unwrap().parse().unwrap();

    let summary = &result.campaigns[&1];
    assert!((junk_pct - summary.stages[&1].percentage).abs() < 0.005);
    assert!((ok_pct - summary.stages[&2].percentage).abs() < 0.005);
    assert_eq!(total, summary.total_leads);
}

#[test]
fn test_all_formats_render_from_live_analysis() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("crm.db");
    setup_crm_db(&db_path);
    seed_junk_scenario(&db_path);

    let store = LeadStore::open(&db_path, "en_US").unwrap();
    let mut engine = AnalysisEngine::new(store).unwrap();
    let result = engine.compute_analysis(None, None).unwrap();

    let export_date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    let writer = ExportWriter::new(export_date);

    let csv_payload = writer.render(&result, ExportFormat::Csv).unwrap();
    assert_eq!(csv_payload.filename, "campaign_analysis_20250307.csv");

    let xlsx_payload = writer.render(&result, ExportFormat::Xlsx).unwrap();
    assert_eq!(xlsx_payload.filename, "campaign_analysis_20250307.xlsx");
    assert_eq!(&xlsx_payload.bytes[0..2], b"PK");

    let pdf_payload = writer.render(&result, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf_payload.filename, "campaign_analysis_20250307.pdf");
    assert_eq!(&pdf_payload.bytes[0..5], b"%PDF-");
}

#[test]
fn test_windowed_export_excludes_out_of_window_leads() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("crm.db");
    setup_crm_db(&db_path);

    let conn = Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO utm_campaign (id, name, active) VALUES (1, 'C1', 1)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO crm_stage (id, name, sequence) VALUES (1, 'New', 1)",
        [],
    )
    .unwrap();
    for ts in [500, 1500, 2500] {
        conn.execute(
            "INSERT INTO crm_lead (campaign_id, stage_id, create_date, active)
             VALUES (1, 1, ?1, 1)",
            params![ts],
        )
        .unwrap();
    }
    drop(conn);

    let store = LeadStore::open(&db_path, "en_US").unwrap();
    let mut engine = AnalysisEngine::new(store).unwrap();
    let result = engine.compute_analysis(Some(1000), Some(2000)).unwrap();

    assert_eq!(result.campaigns[&1].total_leads, 1);

    let bytes = CsvExporter::new().render(&result).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("C1,100.00%,1"));
}

#[test]
fn test_translated_stage_names_reach_the_header() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("crm.db");
    setup_crm_db(&db_path);

    let conn = Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO utm_campaign (id, name, active) VALUES (1, 'C1', 1)",
        [],
    )
    .unwrap();
    conn.execute(
        r#"INSERT INTO crm_stage (id, name, sequence)
           VALUES (1, '{"en_US": "New", "de_DE": "Neu"}', 1)"#,
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO crm_lead (campaign_id, stage_id, create_date, active)
         VALUES (1, 1, 1000, 1)",
        [],
    )
    .unwrap();
    drop(conn);

    let store = LeadStore::open(&db_path, "de_DE").unwrap();
    let mut engine = AnalysisEngine::new(store).unwrap();
    let result = engine.compute_analysis(None, None).unwrap();

    let bytes = CsvExporter::new().render(&result).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Campaign,Neu (%),Total Leads"));
}
