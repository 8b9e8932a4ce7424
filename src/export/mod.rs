//! Export Renderers - CSV, XLSX, and PDF encoders
//!
//! All three encoders consume one `AnalysisResult` and share one column
//! model: a campaign-name column, one column per stage in registry order,
//! and a total-leads column. A deterministic rule set flags anomalous
//! stage/percentage combinations; formats that cannot carry styling drop
//! the flag silently.

pub mod columns;
pub mod csv_export;
pub mod flags;
pub mod format;
pub mod pdf_export;
pub mod writer;
pub mod xlsx_export;

pub use csv_export::CsvExporter;
pub use format::ExportFormat;
pub use pdf_export::PdfExporter;
pub use writer::{ExportError, ExportPayload, ExportWriter};
pub use xlsx_export::XlsxExporter;
