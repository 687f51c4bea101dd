//! CSV report encoder.
//!
//! Flat tabular rows followed by a blank-row-separated summary block. The
//! output starts with a UTF-8 byte-order mark so spreadsheet tools detect the
//! encoding, and amounts keep their thousands separators (the writer quotes
//! them as needed).

use crate::{
    core::report::ReportModel,
    errors::{Error, Result},
    render::{COLUMN_HEADERS, summary_lines},
};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encodes the report as BOM-prefixed CSV bytes.
pub fn render(model: &ReportModel) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(COLUMN_HEADERS)?;

    for row in &model.rows {
        writer.write_record([
            row.s_no.to_string().as_str(),
            &row.invoice_number,
            &row.customer_number,
            &row.status,
            &row.payment_mode,
            &row.total_amount,
            &row.discount_amount,
            &row.invoice_date,
        ])?;
    }

    let mut buffer = writer
        .into_inner()
        .map_err(|e| Error::Render(e.to_string()))?;

    // Blank row between the table and the summary block
    buffer.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    writer.write_record(["SUMMARY", ""])?;
    for (label, value) in summary_lines(model) {
        writer.write_record([label, value.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Render(e.to_string()))
}
