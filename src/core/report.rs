//! Report aggregation - turns a business and a date range into a renderable
//! report model.
//!
//! Request validation here is deliberately accumulate-then-report: every
//! problem with the format, business id, or date range is collected into one
//! list so the caller gets full diagnostics in a single round trip. The
//! aggregation itself is a pure function of the invoice set: running it twice
//! over unchanged data yields identical rows and summary statistics.

use crate::{
    entities::{Business, Invoice, invoice},
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Output format of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Styled spreadsheet (`.xlsx`)
    Excel,
    /// Paginated document (`.pdf`)
    Pdf,
    /// Delimited text with a UTF-8 BOM (`.csv`)
    Csv,
}

impl ReportFormat {
    /// Parses a format name case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "excel" => Some(Self::Excel),
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// A validated report request: format plus an inclusive date range.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest {
    /// Requested output format
    pub format: ReportFormat,
    /// First day of the range
    pub from_date: NaiveDate,
    /// Last day of the range, inclusive of the whole day
    pub to_date: NaiveDate,
}

/// Validates the raw report parameters, collecting every problem found.
///
/// Checks: format is one of excel/pdf/csv (case-insensitive), the business id
/// is a positive integer, both dates parse as `YYYY-MM-DD`, and the range is
/// not inverted. Returns [`Error::ReportValidation`] carrying the full list.
pub fn validate_request(
    format: Option<&str>,
    business_id: i64,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> Result<ReportRequest> {
    let mut errors = Vec::new();

    let format = match format {
        Some(raw) => match ReportFormat::parse(raw) {
            Some(format) => Some(format),
            None => {
                errors.push("format must be one of: excel, pdf, csv".to_string());
                None
            }
        },
        None => {
            errors.push("format is required".to_string());
            None
        }
    };

    if business_id <= 0 {
        errors.push("businessId must be a positive integer".to_string());
    }

    let from_date = parse_date(from_date, "fromDate", &mut errors);
    let to_date = parse_date(to_date, "toDate", &mut errors);

    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from > to {
            errors.push("fromDate must not be after toDate".to_string());
        }
    }

    match (format, from_date, to_date) {
        (Some(format), Some(from_date), Some(to_date)) if errors.is_empty() => Ok(ReportRequest {
            format,
            from_date,
            to_date,
        }),
        _ => Err(Error::ReportValidation { errors }),
    }
}

fn parse_date(value: Option<&str>, field: &str, errors: &mut Vec<String>) -> Option<NaiveDate> {
    match value {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(format!("{field} must be a valid date in YYYY-MM-DD format"));
                None
            }
        },
        None => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

/// One display-ready row of the report, one per invoice in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// 1-based serial number
    pub s_no: usize,
    /// Invoice number
    pub invoice_number: String,
    /// Customer phone number, `"N/A"` when absent
    pub customer_number: String,
    /// Capitalized settlement state
    pub status: String,
    /// Upper-cased payment mode, `"N/A"` when absent
    pub payment_mode: String,
    /// Grand total, grouped with 2 decimals
    pub total_amount: String,
    /// Discount, grouped with 2 decimals
    pub discount_amount: String,
    /// Issue date as `DD Mon YYYY`
    pub invoice_date: String,
}

/// Aggregate statistics over the filtered invoice set. Derived on every
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of invoices in range
    pub total_invoices: usize,
    /// Sum of invoice totals, 2-decimal string
    pub total_amount: String,
    /// Sum of discounts, 2-decimal string
    pub total_discount: String,
    /// Invoices in `paid` state
    pub paid_count: usize,
    /// Invoices in `unpaid` state
    pub unpaid_count: usize,
    /// Invoices in `canceled` state
    pub canceled_count: usize,
}

/// Everything a renderer needs: tenant header data, rows, summary, period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportModel {
    /// Business name for the report header
    pub business_name: String,
    /// GST registration number, when the business has one
    pub gst_number: Option<String>,
    /// First day of the reported period
    pub from_date: NaiveDate,
    /// Last day of the reported period
    pub to_date: NaiveDate,
    /// One row per invoice, ordered by issue date
    pub rows: Vec<ReportRow>,
    /// Aggregate statistics
    pub summary: ReportSummary,
}

impl ReportModel {
    /// `"01 Jan 2025 to 31 Jan 2025"` - the period line shared by all renderers.
    #[must_use]
    pub fn period_label(&self) -> String {
        format!(
            "{} to {}",
            format_display_date(self.from_date),
            format_display_date(self.to_date)
        )
    }
}

/// Fetches all invoices of a business inside the date range and computes the
/// report rows and summary.
///
/// The range is inclusive of the entire `to_date` calendar day (up to
/// 23:59:59), so `from == to` covers exactly one full day.
pub async fn aggregate(
    db: &DatabaseConnection,
    business_id: i64,
    from_date: NaiveDate,
    to_date: NaiveDate,
) -> Result<ReportModel> {
    let business = Business::find_by_id(business_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Business" })?;

    let range_start = Utc.from_utc_datetime(&from_date.and_time(chrono::NaiveTime::MIN));
    let range_end = to_date
        .and_hms_opt(23, 59, 59)
        .map(|end| Utc.from_utc_datetime(&end))
        .ok_or_else(|| Error::Config {
            message: "could not compute end of report range".to_string(),
        })?;

    let invoices = Invoice::find()
        .filter(invoice::Column::BusinessId.eq(business_id))
        .filter(invoice::Column::CreatedAt.gte(range_start))
        .filter(invoice::Column::CreatedAt.lte(range_end))
        .order_by_asc(invoice::Column::CreatedAt)
        .all(db)
        .await?;

    let mut total_amount = 0.0;
    let mut total_discount = 0.0;
    let mut paid_count = 0;
    let mut unpaid_count = 0;
    let mut canceled_count = 0;

    let rows: Vec<ReportRow> = invoices
        .iter()
        .enumerate()
        .map(|(index, inv)| {
            total_amount += inv.total_amount;
            total_discount += inv.discount_amount;
            match inv.status {
                crate::entities::InvoiceStatus::Paid => paid_count += 1,
                crate::entities::InvoiceStatus::Unpaid => unpaid_count += 1,
                crate::entities::InvoiceStatus::Canceled => canceled_count += 1,
            }

            ReportRow {
                s_no: index + 1,
                invoice_number: inv.invoice_number.clone(),
                customer_number: inv
                    .customer_number
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                status: inv.status.label().to_string(),
                payment_mode: inv
                    .payment_mode
                    .map_or_else(|| "N/A".to_string(), |mode| mode.label().to_string()),
                total_amount: format_amount(inv.total_amount),
                discount_amount: format_amount(inv.discount_amount),
                invoice_date: inv.created_at.format("%d %b %Y").to_string(),
            }
        })
        .collect();

    let summary = ReportSummary {
        total_invoices: rows.len(),
        total_amount: format_amount(total_amount),
        total_discount: format_amount(total_discount),
        paid_count,
        unpaid_count,
        canceled_count,
    };

    Ok(ReportModel {
        business_name: business.name,
        gst_number: business.gst_number,
        from_date,
        to_date,
        rows,
        summary,
    })
}

/// Formats an amount with thousands grouping and exactly two decimals,
/// e.g. `1234567.5` becomes `"1,234,567.50"`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().rev().collect();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (count, digit) in digits.iter().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{sign}{int_grouped}.{dec_part}")
}

/// Formats a date as `DD Mon YYYY`, e.g. `"02 Jan 2025"`.
#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}
