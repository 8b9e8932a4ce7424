//! Unified export entry point - routes one analysis result to the encoder
//! for the requested format and hands back a named payload.

use super::csv_export::CsvExporter;
use super::format::ExportFormat;
use super::pdf_export::PdfExporter;
use super::xlsx_export::XlsxExporter;
use crate::analysis_core::AnalysisResult;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Xlsx(rust_xlsxwriter::XlsxError),
    Pdf(printpdf::Error),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(err)
    }
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::Pdf(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Xlsx(e) => write!(f, "XLSX error: {}", e),
            ExportError::Pdf(e) => write!(f, "PDF error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// A fully rendered export: filename plus the complete output bytes
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Routes an analysis result to the encoder for the requested format
pub struct ExportWriter {
    export_date: NaiveDate,
}

impl ExportWriter {
    /// The export date stamps filenames and document metadata; callers pass
    /// it in so repeated renders stay reproducible.
    pub fn new(export_date: NaiveDate) -> Self {
        Self { export_date }
    }

    /// Render the result in one format, entirely in memory
    ///
    /// An encoder failure fails only this call; other formats stay usable.
    pub fn render(
        &self,
        result: &AnalysisResult,
        format: ExportFormat,
    ) -> Result<ExportPayload, ExportError> {
        let bytes = match format {
            ExportFormat::Csv => CsvExporter::new().render(result)?,
            ExportFormat::Xlsx => XlsxExporter::new().render(result, self.export_date)?,
            ExportFormat::Pdf => PdfExporter::new().render(result, self.export_date)?,
        };

        Ok(ExportPayload {
            filename: format.filename(self.export_date),
            bytes,
        })
    }

    /// Render and write to `dir`; the file is only created after the render
    /// fully succeeded, so no partial output ever lands as complete.
    pub async fn save_to_dir(
        &self,
        result: &AnalysisResult,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let payload = self.render(result, format)?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&payload.filename);
        tokio::fs::write(&path, &payload.bytes).await?;

        log::info!(
            "✅ Exported {} ({} bytes)",
            path.display(),
            payload.bytes.len()
        );

        Ok(path)
    }
}
