//! Export format selection and output naming

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn all() -> [ExportFormat; 3] {
        [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf]
    }

    /// Output filename, stamped with the export date (not the window)
    pub fn filename(&self, export_date: NaiveDate) -> String {
        format!(
            "campaign_analysis_{}.{}",
            export_date.format("%Y%m%d"),
            self.extension()
        )
    }
}
