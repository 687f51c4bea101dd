//! Report renderers.
//!
//! Three independent encoders consume the same [`ReportModel`] and produce a
//! complete byte buffer: a styled spreadsheet, a paginated PDF, and a
//! BOM-prefixed CSV. A renderer either returns the whole document or an
//! error; partial output is never handed back to the transport layer.

/// CSV encoder
pub mod csv;
/// Spreadsheet (`.xlsx`) encoder
pub mod excel;
/// Paginated PDF encoder
pub mod pdf;

use crate::{
    core::report::{ReportFormat, ReportModel},
    errors::Result,
};

/// Table headers shared by all three renderers.
pub(crate) const COLUMN_HEADERS: [&str; 8] = [
    "S.No",
    "Invoice Number",
    "Customer Number",
    "Status",
    "Payment Mode",
    "Total Amount",
    "Discount",
    "Invoice Date",
];

/// Renders the report model in the requested format.
pub fn render(format: ReportFormat, model: &ReportModel) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Excel => excel::render(model),
        ReportFormat::Pdf => pdf::render(model),
        ReportFormat::Csv => csv::render(model),
    }
}

/// The summary block as label/value pairs, in presentation order.
pub(crate) fn summary_lines(model: &ReportModel) -> [(&'static str, String); 6] {
    let summary = &model.summary;
    [
        ("Total Invoices", summary.total_invoices.to_string()),
        ("Total Amount", summary.total_amount.clone()),
        ("Total Discount", summary.total_discount.clone()),
        ("Paid", summary.paid_count.to_string()),
        ("Unpaid", summary.unpaid_count.to_string()),
        ("Canceled", summary.canceled_count.to_string()),
    ]
}
