//! Paginated PDF report encoder.
//!
//! A4 portrait pages. Page one carries the business header, GST line, report
//! title and period, and the summary block; every page draws the bordered
//! fixed-width table header before its data rows, and a row that would cross
//! the bottom margin opens a fresh page. Rendering is an explicit two-phase
//! algorithm: phase one lays out all pages and records a handle per page,
//! phase two revisits every page to stamp the footer once the total page
//! count is known.

use crate::{core::report::ReportModel, errors::Error, errors::Result};
use chrono::Utc;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use std::io::BufWriter;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 195.0;
/// Rows stop here; the footer band lives below
const BOTTOM_LIMIT: f32 = 25.0;
const ROW_HEIGHT: f32 = 7.0;

/// Column widths in mm; sums to the printable width
const COLUMN_WIDTHS: [f32; 8] = [12.0, 32.0, 26.0, 18.0, 20.0, 24.0, 22.0, 26.0];

/// Handle to a laid-out page, kept for the footer pass
struct PageHandle {
    page: PdfPageIndex,
    layer: PdfLayerIndex,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn column_x(index: usize) -> f32 {
    MARGIN_LEFT + COLUMN_WIDTHS[..index].iter().sum::<f32>()
}

fn horizontal_line(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
            (Point::new(Mm(MARGIN_RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn vertical_line(layer: &PdfLayerReference, x: f32, y_top: f32, y_bottom: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y_top)), false),
            (Point::new(Mm(x), Mm(y_bottom)), false),
        ],
        is_closed: false,
    });
}

/// Draws the table header row; returns the y where data rows start.
fn draw_table_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) -> f32 {
    horizontal_line(layer, y);
    let text_y = y - 5.0;
    for (index, header) in crate::render::COLUMN_HEADERS.iter().enumerate() {
        layer.use_text(*header, 9.0, Mm(column_x(index) + 1.5), Mm(text_y), &fonts.bold);
    }
    let bottom = y - ROW_HEIGHT;
    horizontal_line(layer, bottom);
    bottom
}

fn draw_row(layer: &PdfLayerReference, fonts: &Fonts, row: &crate::core::report::ReportRow, y: f32) -> f32 {
    let text_y = y - 5.0;
    let cells = [
        row.s_no.to_string(),
        row.invoice_number.clone(),
        row.customer_number.clone(),
        row.status.clone(),
        row.payment_mode.clone(),
        row.total_amount.clone(),
        row.discount_amount.clone(),
        row.invoice_date.clone(),
    ];
    for (index, cell) in cells.iter().enumerate() {
        layer.use_text(cell, 9.0, Mm(column_x(index) + 1.5), Mm(text_y), &fonts.regular);
    }
    let bottom = y - ROW_HEIGHT;
    horizontal_line(layer, bottom);
    bottom
}

/// Closes out one page's table by ruling the column separators.
fn draw_column_borders(layer: &PdfLayerReference, table_top: f32, table_bottom: f32) {
    for index in 0..=COLUMN_WIDTHS.len() {
        let x = if index == COLUMN_WIDTHS.len() {
            MARGIN_RIGHT
        } else {
            column_x(index)
        };
        vertical_line(layer, x, table_top, table_bottom);
    }
}

fn add_page(doc: &PdfDocumentReference, pages: &mut Vec<PageHandle>) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    pages.push(PageHandle { page, layer });
    doc.get_page(page).get_layer(layer)
}

/// Encodes the report as a paginated PDF document.
#[allow(clippy::too_many_lines)]
pub fn render(model: &ReportModel) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Invoice Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Render(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| Error::Render(e.to_string()))?,
    };

    let mut pages = vec![PageHandle {
        page: first_page,
        layer: first_layer,
    }];

    // Phase 1: lay out pages
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    layer.set_outline_thickness(0.3);
    layer.set_fill_color(black());

    let mut y = PAGE_HEIGHT - 15.0;

    // Page 1 header: business, GST, title, period, summary block
    layer.use_text(&model.business_name, 16.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    y -= 7.0;
    if let Some(gst_number) = &model.gst_number {
        layer.use_text(
            format!("GSTIN: {gst_number}"),
            10.0,
            Mm(MARGIN_LEFT),
            Mm(y),
            &fonts.regular,
        );
        y -= 6.0;
    }
    layer.use_text("Invoice Report", 13.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    y -= 6.0;
    layer.use_text(
        format!("Report Period: {}", model.period_label()),
        10.0,
        Mm(MARGIN_LEFT),
        Mm(y),
        &fonts.regular,
    );
    y -= 10.0;

    layer.use_text("Summary", 11.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    y -= 6.0;
    for (label, value) in crate::render::summary_lines(model) {
        layer.use_text(
            format!("{label}: {value}"),
            10.0,
            Mm(MARGIN_LEFT + 2.0),
            Mm(y),
            &fonts.regular,
        );
        y -= 5.0;
    }
    y -= 6.0;

    // Table, breaking to new pages as rows run out of room
    let mut table_top = y;
    y = draw_table_header(&layer, &fonts, y);

    for row in &model.rows {
        if y - ROW_HEIGHT < BOTTOM_LIMIT {
            // Close the current page's borders, then continue on a fresh one
            draw_column_borders(&layer, table_top, y);
            layer = add_page(&doc, &mut pages);
            layer.set_outline_thickness(0.3);
            layer.set_fill_color(black());
            table_top = PAGE_HEIGHT - 15.0;
            y = draw_table_header(&layer, &fonts, table_top);
        }
        y = draw_row(&layer, &fonts, row, y);
    }
    draw_column_borders(&layer, table_top, y);

    // Phase 2: with the page count final, stamp every footer
    let total_pages = pages.len();
    let generated = Utc::now().format("%d %b %Y %H:%M:%S UTC").to_string();
    for (index, handle) in pages.iter().enumerate() {
        let footer_layer = doc.get_page(handle.page).get_layer(handle.layer);
        footer_layer.use_text(
            format!("Generated on {generated}"),
            8.0,
            Mm(MARGIN_LEFT),
            Mm(12.0),
            &fonts.regular,
        );
        footer_layer.use_text(
            format!("Page {} of {}", index + 1, total_pages),
            8.0,
            Mm(MARGIN_RIGHT - 25.0),
            Mm(12.0),
            &fonts.regular,
        );
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::report::ReportRow;
    use crate::test_utils::sample_report_model;

    fn page_count(bytes: &[u8]) -> usize {
        // Count page objects in the uncompressed cross-reference section
        let text = String::from_utf8_lossy(bytes);
        text.matches("/Type/Page").count() - text.matches("/Type/Pages").count()
    }

    #[test]
    fn test_produces_pdf_magic() {
        let bytes = render(&sample_report_model()).unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn test_small_report_fits_one_page() {
        let bytes = render(&sample_report_model()).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_long_report_overflows_to_new_pages() {
        let mut model = sample_report_model();
        let template = model.rows[0].clone();
        model.rows = (1..=120)
            .map(|s_no| ReportRow {
                s_no,
                ..template.clone()
            })
            .collect();

        let bytes = render(&model).unwrap();
        assert!(page_count(&bytes) >= 2);
    }

    #[test]
    fn test_empty_report_still_renders() {
        let mut model = sample_report_model();
        model.rows.clear();
        let bytes = render(&model).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }
}
