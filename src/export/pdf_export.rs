//! Paginated document encoder
//!
//! Renders the breakdown as an A4 landscape table with built-in Helvetica
//! fonts. Flagged cells are printed in the red emphasis color; the legend
//! follows the data on the final page. Rows that overflow a page continue
//! on a fresh one.

use super::columns;
use super::flags;
use super::writer::ExportError;
use crate::analysis_core::AnalysisResult;
use chrono::NaiveDate;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 15.0;
const ROW_STEP_MM: f32 = 7.0;
const BOTTOM_LIMIT_MM: f32 = 20.0;
const CAMPAIGN_COL_WIDTH_MM: f32 = 60.0;
const TOTAL_COL_WIDTH_MM: f32 = 25.0;

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn flag_red() -> Color {
    Color::Rgb(Rgb::new(0.6, 0.0, 0.0, None))
}

pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        result: &AnalysisResult,
        export_date: NaiveDate,
    ) -> Result<Vec<u8>, ExportError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            "Campaign Analysis",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);

        layer.use_text("Campaign Analysis", 16.0, Mm(MARGIN_MM), Mm(195.0), &bold);
        layer.use_text(
            format!("Exported {}", export_date.format("%Y-%m-%d")),
            10.0,
            Mm(MARGIN_MM),
            Mm(188.0),
            &font,
        );

        let stage_count = result.stages.len();
        let stage_area = PAGE_WIDTH_MM
            - 2.0 * MARGIN_MM
            - CAMPAIGN_COL_WIDTH_MM
            - TOTAL_COL_WIDTH_MM;
        let stage_width = if stage_count > 0 {
            stage_area / stage_count as f32
        } else {
            stage_area
        };
        let total_x = MARGIN_MM + CAMPAIGN_COL_WIDTH_MM + stage_area;

        let labels = columns::header_labels(result);
        let mut y = 178.0;
        write_header_row(&layer, &bold, &labels, stage_width, total_x, y);
        y -= ROW_STEP_MM;

        for (_, summary) in result.ordered_campaigns() {
            if y < BOTTOM_LIMIT_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = 195.0;
                write_header_row(&layer, &bold, &labels, stage_width, total_x, y);
                y -= ROW_STEP_MM;
            }

            layer.use_text(summary.name.clone(), 9.0, Mm(MARGIN_MM), Mm(y), &font);

            for (i, column) in result.stages.iter().enumerate() {
                let cell = columns::stage_cell(summary, column.id);
                let fraction = cell.percentage / 100.0;
                let x = MARGIN_MM + CAMPAIGN_COL_WIDTH_MM + i as f32 * stage_width;

                if flags::is_flagged(&column.name, fraction) {
                    layer.set_fill_color(flag_red());
                    layer.use_text(format!("{:.2}%", cell.percentage), 9.0, Mm(x), Mm(y), &font);
                    layer.set_fill_color(black());
                } else {
                    layer.use_text(format!("{:.2}%", cell.percentage), 9.0, Mm(x), Mm(y), &font);
                }
            }

            layer.use_text(
                summary.total_leads.to_string(),
                9.0,
                Mm(total_x),
                Mm(y),
                &font,
            );
            y -= ROW_STEP_MM;
        }

        // Legend, on a fresh page when the remaining space cannot hold it
        let legend_height = ROW_STEP_MM * (flags::LEGEND_LINES.len() as f32 + 1.0);
        y -= ROW_STEP_MM;
        if y - legend_height < BOTTOM_LIMIT_MM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = 195.0;
        }

        layer.use_text(flags::LEGEND_TITLE, 10.0, Mm(MARGIN_MM), Mm(y), &bold);
        for line in flags::LEGEND_LINES.iter() {
            y -= ROW_STEP_MM;
            // Builtin-font encoding has no bullet glyph; use a dash
            let line = format!("- {}", line.trim_start_matches("• "));
            layer.use_text(line, 9.0, Mm(MARGIN_MM), Mm(y), &font);
        }

        let mut buffer = BufWriter::new(Vec::new());
        doc.save(&mut buffer)?;
        buffer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_header_row(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    labels: &[String],
    stage_width: f32,
    total_x: f32,
    y: f32,
) {
    // labels = [campaign, stage..., total]
    layer.use_text(labels[0].clone(), 9.0, Mm(MARGIN_MM), Mm(y), bold);
    for (i, label) in labels[1..labels.len() - 1].iter().enumerate() {
        let x = MARGIN_MM + CAMPAIGN_COL_WIDTH_MM + i as f32 * stage_width;
        layer.use_text(label.clone(), 9.0, Mm(x), Mm(y), bold);
    }
    layer.use_text(
        labels[labels.len() - 1].clone(),
        9.0,
        Mm(total_x),
        Mm(y),
        bold,
    );
}
