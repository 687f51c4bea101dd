//! Spreadsheet report encoder.
//!
//! Produces a single styled worksheet: title band, business header, period
//! line, a SUMMARY block, and a DETAILS table with a colored header row,
//! alternating row shading, status-colored text, and right-aligned currency
//! columns. The workbook is returned as an in-memory `.xlsx` byte buffer.

use crate::{
    core::report::ReportModel,
    errors::Result,
    render::{COLUMN_HEADERS, summary_lines},
};
use chrono::Utc;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

const HEADER_FILL: Color = Color::RGB(0x4472C4);
const SHADED_ROW_FILL: Color = Color::RGB(0xF2F2F2);
const PAID_TEXT: Color = Color::RGB(0x2E7D32);
const UNPAID_TEXT: Color = Color::RGB(0xE65100);
const CANCELED_TEXT: Color = Color::RGB(0xC62828);

const COLUMN_WIDTHS: [f64; 8] = [8.0, 20.0, 18.0, 12.0, 14.0, 16.0, 14.0, 16.0];

fn status_color(status: &str) -> Color {
    match status {
        "Paid" => PAID_TEXT,
        "Unpaid" => UNPAID_TEXT,
        _ => CANCELED_TEXT,
    }
}

/// Encodes the report as a styled single-sheet workbook.
#[allow(clippy::too_many_lines)]
pub fn render(model: &ReportModel) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Invoice Report")?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        worksheet.set_column_width(col as u16, *width)?;
    }

    let title_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_align(FormatAlign::Center);
    let business_format = Format::new().set_bold().set_font_size(12);
    let section_format = Format::new().set_bold().set_font_color(HEADER_FILL);
    let label_format = Format::new().set_bold();

    // Title band
    worksheet.merge_range(0, 0, 0, 7, "Invoice Report", &title_format)?;

    // Business header and report period
    worksheet.write_with_format(1, 0, model.business_name.as_str(), &business_format)?;
    let mut row = 2;
    if let Some(gst_number) = &model.gst_number {
        worksheet.write(row, 0, format!("GSTIN: {gst_number}"))?;
        row += 1;
    }
    worksheet.write(row, 0, format!("Report Period: {}", model.period_label()))?;
    row += 2;

    // SUMMARY section: label/value pairs
    worksheet.write_with_format(row, 0, "SUMMARY", &section_format)?;
    row += 1;
    for (label, value) in summary_lines(model) {
        worksheet.write_with_format(row, 0, label, &label_format)?;
        worksheet.write(row, 1, value)?;
        row += 1;
    }
    row += 1;

    // DETAILS section: styled header then one row per invoice
    worksheet.write_with_format(row, 0, "DETAILS", &section_format)?;
    row += 1;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(HEADER_FILL)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        worksheet.write_with_format(row, col as u16, *header, &header_format)?;
    }
    row += 1;

    for (index, data_row) in model.rows.iter().enumerate() {
        let shaded = index % 2 == 1;

        let mut text_format = Format::new().set_border(FormatBorder::Thin);
        let mut currency_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Right);
        let mut status_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_bold()
            .set_font_color(status_color(&data_row.status));
        if shaded {
            text_format = text_format.set_background_color(SHADED_ROW_FILL);
            currency_format = currency_format.set_background_color(SHADED_ROW_FILL);
            status_format = status_format.set_background_color(SHADED_ROW_FILL);
        }

        #[allow(clippy::cast_precision_loss)]
        worksheet.write_with_format(row, 0, data_row.s_no as f64, &text_format)?;
        worksheet.write_with_format(row, 1, data_row.invoice_number.as_str(), &text_format)?;
        worksheet.write_with_format(row, 2, data_row.customer_number.as_str(), &text_format)?;
        worksheet.write_with_format(row, 3, data_row.status.as_str(), &status_format)?;
        worksheet.write_with_format(row, 4, data_row.payment_mode.as_str(), &text_format)?;
        worksheet.write_with_format(row, 5, data_row.total_amount.as_str(), &currency_format)?;
        worksheet.write_with_format(row, 6, data_row.discount_amount.as_str(), &currency_format)?;
        worksheet.write_with_format(row, 7, data_row.invoice_date.as_str(), &text_format)?;
        row += 1;
    }

    // Footer timestamp
    row += 1;
    let generated = Utc::now().format("%d %b %Y %H:%M:%S UTC");
    worksheet.write(row, 0, format!("Generated on {generated}"))?;

    workbook.save_to_buffer().map_err(Into::into)
}
