//! Report document composer
//!
//! Lays out one summary into a single-page US-Letter PDF 1.4 document:
//! header band, executive summary metric cards, parameter statistics table,
//! the embedded distribution chart and a derived insight sentence.
//!
//! The writer emits the PDF objects directly; the chart raster is embedded as
//! an uncompressed DeviceRGB image XObject. Composition is pure: the same
//! summary, dataset id and timestamp always produce identical bytes (the
//! generation timestamp is a parameter, never sampled here).

use super::chart::ChartRenderer;
use super::{ReportDocument, ReportError};
use crate::models::{DatasetId, Summary};
use chrono::{DateTime, Utc};

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;

// Palette carried over from the product's report styling.
const HEADER_BG: (u8, u8, u8) = (0x2C, 0x3E, 0x50);
const CARD_BG: (u8, u8, u8) = (0xEC, 0xF0, 0xF1);
const CARD_LABEL: (u8, u8, u8) = (0x7F, 0x8C, 0x8D);
const TABLE_HEADER_BG: (u8, u8, u8) = (0x34, 0x49, 0x5E);
const WHITE: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);
const BLACK: (u8, u8, u8) = (0x00, 0x00, 0x00);

/// Composes the report PDF from a summary. Stateless apart from the chart
/// renderer it owns.
pub struct DocumentComposer {
    chart: ChartRenderer,
}

impl DocumentComposer {
    pub fn new() -> Self {
        Self {
            chart: ChartRenderer::new(),
        }
    }

    /// Render the report for one dataset.
    ///
    /// A zero-count summary renders the header band and a "no data" notice in
    /// place of the analysis sections; no percentage is ever computed against
    /// a zero total.
    pub fn compose(
        &self,
        summary: &Summary,
        dataset_id: DatasetId,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument, ReportError> {
        let content = self.content_stream(summary, dataset_id, generated_at);
        let raster = self.chart.rasterize(&summary.type_distribution).into_raw();
        let bytes = assemble_pdf(&content, &raster, dataset_id, generated_at);

        Ok(ReportDocument {
            filename: format!("report_{dataset_id}.pdf"),
            bytes,
        })
    }

    fn content_stream(
        &self,
        summary: &Summary,
        dataset_id: DatasetId,
        generated_at: DateTime<Utc>,
    ) -> Vec<u8> {
        let mut c = Vec::new();

        // Header band.
        set_fill(&mut c, HEADER_BG);
        fill_rect(&mut c, 0.0, PAGE_HEIGHT - 80.0, PAGE_WIDTH, 80.0);
        set_fill(&mut c, WHITE);
        show_text(&mut c, "F2", 24.0, 30.0, 742.0, "Analytical Data Report");
        let subtitle = format!(
            "Dataset ID: #{}  |  Generated: {}",
            dataset_id,
            generated_at.format("%Y-%m-%d %H:%M")
        );
        show_text(&mut c, "F1", 12.0, 30.0, 722.0, &subtitle);

        if summary.is_empty() {
            set_fill(&mut c, BLACK);
            show_text(
                &mut c,
                "F1",
                12.0,
                30.0,
                672.0,
                "No summary data available to analyze.",
            );
            return c;
        }

        // 1. Executive summary metric cards.
        set_fill(&mut c, BLACK);
        show_text(&mut c, "F2", 14.0, 30.0, 672.0, "1. Executive Summary");
        let metrics = [
            ("Total Records", summary.total_count.to_string()),
            ("Avg Flowrate", format_value(summary.averages.flowrate)),
            ("Avg Pressure", format_value(summary.averages.pressure)),
        ];
        for (i, (label, value)) in metrics.iter().enumerate() {
            let x = 30.0 + i as f64 * 170.0;
            set_fill(&mut c, CARD_BG);
            fill_rect(&mut c, x, 602.0, 150.0, 50.0);
            set_fill(&mut c, CARD_LABEL);
            show_text(&mut c, "F1", 10.0, x + 10.0, 632.0, label);
            set_fill(&mut c, HEADER_BG);
            show_text(&mut c, "F2", 18.0, x + 10.0, 612.0, value);
        }

        // 2. Parameter statistics table.
        set_fill(&mut c, BLACK);
        show_text(&mut c, "F2", 14.0, 30.0, 562.0, "2. Parameter Statistics");
        let rows = [
            ("Flowrate", format_value(summary.averages.flowrate), "m³/h"),
            ("Pressure", format_value(summary.averages.pressure), "bar"),
            (
                "Temperature",
                format_value(summary.averages.temperature),
                "°C",
            ),
        ];

        set_fill(&mut c, TABLE_HEADER_BG);
        fill_rect(&mut c, 30.0, 522.0, 450.0, 20.0);
        set_fill(&mut c, WHITE);
        show_text(&mut c, "F2", 10.0, 38.0, 528.0, "Parameter");
        show_text(&mut c, "F2", 10.0, 238.0, 528.0, "Average Value");
        show_text(&mut c, "F2", 10.0, 388.0, 528.0, "Unit (Est.)");

        for (i, (name, value, unit)) in rows.iter().enumerate() {
            let y = 502.0 - i as f64 * 20.0;
            set_fill(&mut c, CARD_BG);
            fill_rect(&mut c, 30.0, y, 450.0, 20.0);
            set_fill(&mut c, BLACK);
            show_text(&mut c, "F1", 10.0, 38.0, y + 6.0, name);
            show_text(&mut c, "F1", 10.0, 238.0, y + 6.0, value);
            show_text(&mut c, "F1", 10.0, 388.0, y + 6.0, unit);
        }

        // 3. Distribution chart.
        set_fill(&mut c, BLACK);
        show_text(
            &mut c,
            "F2",
            14.0,
            30.0,
            432.0,
            "3. Equipment Distribution Analysis",
        );
        c.extend_from_slice(b"q\n500 0 0 300 56 112 cm\n/Im1 Do\nQ\n");

        // Derived insight.
        set_fill(&mut c, HEADER_BG);
        let insight = match summary.dominant_type() {
            Some((name, count)) if summary.total_count > 0 => {
                let percentage = 100.0 * count as f64 / summary.total_count as f64;
                format!(
                    "Insight: The data is dominated by '{}' units, which make up {:.1}% of the total equipment inventory.",
                    name, percentage
                )
            }
            _ => "Insight: no equipment distribution data available.".to_string(),
        };
        show_text(&mut c, "F3", 11.0, 30.0, 90.0, &insight);

        c
    }
}

impl Default for DocumentComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format an average the way the summary stores it: up to 2 decimals, no
/// trailing zeros (`5` rather than `5.00`, `22.5` as-is).
fn format_value(value: f64) -> String {
    format!("{}", value)
}

fn set_fill(buf: &mut Vec<u8>, (r, g, b): (u8, u8, u8)) {
    buf.extend_from_slice(
        format!(
            "{:.3} {:.3} {:.3} rg\n",
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0
        )
        .as_bytes(),
    );
}

fn fill_rect(buf: &mut Vec<u8>, x: f64, y: f64, w: f64, h: f64) {
    buf.extend_from_slice(format!("{:.2} {:.2} {:.2} {:.2} re f\n", x, y, w, h).as_bytes());
}

fn show_text(buf: &mut Vec<u8>, font: &str, size: f64, x: f64, y: f64, text: &str) {
    buf.extend_from_slice(format!("BT\n/{} {:.1} Tf\n{:.2} {:.2} Td\n(", font, size, x, y).as_bytes());
    buf.extend_from_slice(&encode_pdf_text(text));
    buf.extend_from_slice(b") Tj\nET\n");
}

/// Escape PDF string delimiters and encode to Latin-1 so the unit glyphs
/// (`³`, `°`) render under WinAnsiEncoding. Characters outside Latin-1 are
/// replaced with `?`.
fn encode_pdf_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            _ => {
                let code = ch as u32;
                out.push(if code <= 0xFF { code as u8 } else { b'?' });
            }
        }
    }
    out
}

/// Assemble the final PDF 1.4 byte stream: catalog, page tree, content,
/// fonts, the chart image XObject, info dictionary and xref table.
fn assemble_pdf(
    content: &[u8],
    chart_rgb: &[u8],
    dataset_id: DatasetId,
    generated_at: DateTime<Utc>,
) -> Vec<u8> {
    let mut pdf = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n");
    pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut xref_positions: Vec<usize> = Vec::new();

    // Object 1: Catalog
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    // Object 2: Pages
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    // Object 3: Page
    xref_positions.push(pdf.len());
    let page_obj = format!(
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.0} {:.0}] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R /F2 6 0 R /F3 7 0 R >> /XObject << /Im1 8 0 R >> >> >>\nendobj\n",
        PAGE_WIDTH, PAGE_HEIGHT
    );
    pdf.extend_from_slice(page_obj.as_bytes());

    // Object 4: Content stream
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(format!("4 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes());
    pdf.extend_from_slice(content);
    pdf.extend_from_slice(b"\nendstream\nendobj\n");

    // Objects 5-7: Fonts
    for (num, base_font) in [
        (5, "Helvetica"),
        (6, "Helvetica-Bold"),
        (7, "Helvetica-Oblique"),
    ] {
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
                num, base_font
            )
            .as_bytes(),
        );
    }

    // Object 8: Chart image XObject (uncompressed DeviceRGB raster)
    xref_positions.push(pdf.len());
    pdf.extend_from_slice(
        format!(
            "8 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>\nstream\n",
            ChartRenderer::WIDTH,
            ChartRenderer::HEIGHT,
            chart_rgb.len()
        )
        .as_bytes(),
    );
    pdf.extend_from_slice(chart_rgb);
    pdf.extend_from_slice(b"\nendstream\nendobj\n");

    // Object 9: Info dictionary
    xref_positions.push(pdf.len());
    let info_obj = format!(
        "9 0 obj\n<< /Title (Analytical Data Report - Dataset {}) /Producer (Equipment Analytics SDK) /CreationDate (D:{}) >>\nendobj\n",
        dataset_id,
        generated_at.format("%Y%m%d%H%M%S")
    );
    pdf.extend_from_slice(info_obj.as_bytes());

    // Cross-reference table
    let xref_start = pdf.len();
    pdf.extend_from_slice(b"xref\n");
    pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for pos in &xref_positions {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
    }

    // Trailer
    pdf.extend_from_slice(b"trailer\n");
    pdf.extend_from_slice(
        format!(
            "<< /Size {} /Root 1 0 R /Info 9 0 R >>\n",
            xref_positions.len() + 1
        )
        .as_bytes(),
    );
    pdf.extend_from_slice(b"startxref\n");
    pdf.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    pdf.extend_from_slice(b"%%EOF\n");

    pdf
}
