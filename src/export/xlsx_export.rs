//! Spreadsheet encoder
//!
//! Percentage cells are native percentage-typed and hold the fraction
//! (0.2034, not 20.34). Flagged cells get the red emphasis style, and a
//! legend describing the four rules follows the data after a blank-row gap.

use super::columns;
use super::flags;
use super::writer::ExportError;
use crate::analysis_core::AnalysisResult;
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook,
};

pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        result: &AnalysisResult,
        export_date: NaiveDate,
    ) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();

        // Pin the document creation date so identical inputs produce
        // byte-identical workbooks
        let created = ExcelDateTime::from_ymd(
            export_date.year() as u16,
            export_date.month() as u8,
            export_date.day() as u8,
        )?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Campaign Analysis")?;

        let header_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(0xD3D3D3))
            .set_border(FormatBorder::Thin);

        let percentage_format = Format::new()
            .set_num_format("0.00%")
            .set_border(FormatBorder::Thin);

        let red_percentage_format = Format::new()
            .set_num_format("0.00%")
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(0xFF9999))
            .set_font_color(Color::RGB(0x990000));

        let number_format = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        let text_format = Format::new().set_border(FormatBorder::Thin);

        for (col, label) in columns::header_labels(result).iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, label.as_str(), &header_format)?;
        }
        let total_col = (result.stages.len() + 1) as u16;

        let mut row: u32 = 1;
        for (_, summary) in result.ordered_campaigns() {
            worksheet.write_string_with_format(row, 0, summary.name.as_str(), &text_format)?;

            for (i, column) in result.stages.iter().enumerate() {
                let cell = columns::stage_cell(summary, column.id);
                let fraction = cell.percentage / 100.0;

                let cell_format = if flags::is_flagged(&column.name, fraction) {
                    &red_percentage_format
                } else {
                    &percentage_format
                };

                worksheet.write_number_with_format(
                    row,
                    (i + 1) as u16,
                    fraction,
                    cell_format,
                )?;
            }

            worksheet.write_number_with_format(
                row,
                total_col,
                summary.total_leads as f64,
                &number_format,
            )?;
            row += 1;
        }

        worksheet.set_column_width(0, 30)?;
        for col in 1..=total_col {
            worksheet.set_column_width(col, 15)?;
        }

        // Legend after a blank-row gap
        let legend_row = row + 3;
        let legend_title_format = Format::new().set_bold();
        worksheet.write_string_with_format(legend_row, 0, flags::LEGEND_TITLE, &legend_title_format)?;
        for (i, line) in flags::LEGEND_LINES.iter().enumerate() {
            worksheet.write_string(legend_row + 1 + i as u32, 0, *line)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}
