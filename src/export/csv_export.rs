//! Delimited-text encoder
//!
//! Percentages render as fixed two-decimal values with a literal percent
//! sign; totals as unscaled integers. The flag rules have no representation
//! in this format and are dropped.

use super::columns;
use super::writer::ExportError;
use crate::analysis_core::AnalysisResult;

pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, result: &AnalysisResult) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(columns::header_labels(result))?;

        for (_, summary) in result.ordered_campaigns() {
            let mut record = Vec::with_capacity(result.stages.len() + 2);
            record.push(summary.name.clone());
            for column in &result.stages {
                let cell = columns::stage_cell(summary, column.id);
                record.push(format!("{:.2}%", cell.percentage));
            }
            record.push(summary.total_leads.to_string());
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.into_error().into()))
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
