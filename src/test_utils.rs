//! Shared test utilities for `BillMate`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{calculator::NewInvoiceItem, invoice::NewInvoice, invoice_number},
    entities::{InvoiceStatus, PaymentMode, business, invoice, user},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test business with sensible defaults.
pub async fn create_test_business(
    db: &DatabaseConnection,
    name: &str,
    gst_number: Option<&str>,
) -> Result<business::Model> {
    let now = Utc::now();
    business::ActiveModel {
        name: Set(name.to_string()),
        gst_number: Set(gst_number.map(ToString::to_string)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test user belonging to the given business.
pub async fn create_test_user(
    db: &DatabaseConnection,
    business_id: i64,
    name: &str,
) -> Result<user::Model> {
    user::ActiveModel {
        business_id: Set(business_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a complete test environment with one business and one user.
/// Returns (db, business, user) for common tenant-scoped scenarios.
pub async fn seeded_tenant() -> Result<(DatabaseConnection, business::Model, user::Model)> {
    let db = setup_test_db().await?;
    let business = create_test_business(&db, "Test Traders", Some("22AAAAA0000A1Z5")).await?;
    let user = create_test_user(&db, business.id, "Test User").await?;
    Ok((db, business, user))
}

/// Builds a well-formed line item request.
#[must_use]
pub fn new_item(product_name: &str, quantity: i64, rate: f64) -> NewInvoiceItem {
    NewInvoiceItem {
        product_name: Some(product_name.to_string()),
        quantity: Some(quantity),
        rate: Some(rate),
        ..Default::default()
    }
}

/// Builds an invoice creation request with the given fields.
#[must_use]
pub fn new_request(
    status: &str,
    payment_mode: &str,
    discount: Option<f64>,
    items: Vec<NewInvoiceItem>,
) -> NewInvoice {
    NewInvoice {
        status: Some(status.to_string()),
        payment_mode: Some(payment_mode.to_string()),
        discount,
        items,
        ..Default::default()
    }
}

/// Inserts an invoice row directly, dated at noon UTC on the given day.
/// Bypasses the creation workflow so report tests can control timestamps.
pub async fn insert_invoice_on(
    db: &DatabaseConnection,
    business: &business::Model,
    user: &user::Model,
    total_amount: f64,
    status: InvoiceStatus,
    day: &str,
) -> Result<invoice::Model> {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| Error::Config {
        message: format!("bad test date {day}: {e}"),
    })?;
    let timestamp = date.and_hms_opt(12, 0, 0).ok_or_else(|| Error::Config {
        message: "bad test time".to_string(),
    })?;
    insert_invoice_with_timestamp(db, business, user, total_amount, status, timestamp.and_utc())
        .await
}

/// Inserts an invoice row at an exact RFC 3339 timestamp.
pub async fn insert_invoice_at(
    db: &DatabaseConnection,
    business: &business::Model,
    user: &user::Model,
    total_amount: f64,
    status: InvoiceStatus,
    timestamp: &str,
) -> Result<invoice::Model> {
    let parsed: DateTime<Utc> = timestamp
        .parse()
        .map_err(|e| Error::Config {
            message: format!("bad test timestamp {timestamp}: {e}"),
        })?;
    insert_invoice_with_timestamp(db, business, user, total_amount, status, parsed).await
}

async fn insert_invoice_with_timestamp(
    db: &DatabaseConnection,
    business: &business::Model,
    user: &user::Model,
    total_amount: f64,
    status: InvoiceStatus,
    timestamp: DateTime<Utc>,
) -> Result<invoice::Model> {
    let number = invoice_number::generate_unique(db, business.id).await?;
    invoice::ActiveModel {
        business_id: Set(business.id),
        user_id: Set(user.id),
        invoice_number: Set(number),
        customer_number: Set(Some("9876543210".to_string())),
        total_amount: Set(total_amount),
        discount_amount: Set(0.0),
        payment_mode: Set(Some(PaymentMode::Cash)),
        status: Set(status),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a paid invoice with no customer number or payment mode, the shape
/// of rows that predate those columns.
pub async fn insert_bare_invoice(
    db: &DatabaseConnection,
    business: &business::Model,
    user: &user::Model,
    total_amount: f64,
) -> Result<invoice::Model> {
    let number = invoice_number::generate_unique(db, business.id).await?;
    let now = Utc::now();
    invoice::ActiveModel {
        business_id: Set(business.id),
        user_id: Set(user.id),
        invoice_number: Set(number),
        customer_number: Set(None),
        total_amount: Set(total_amount),
        discount_amount: Set(0.0),
        payment_mode: Set(None),
        status: Set(InvoiceStatus::Paid),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Builds a small in-memory report model for renderer tests, no database needed.
#[must_use]
pub fn sample_report_model() -> crate::core::report::ReportModel {
    use crate::core::report::{ReportModel, ReportRow, ReportSummary};

    let rows = vec![
        ReportRow {
            s_no: 1,
            invoice_number: "INV1AB12CD34".to_string(),
            customer_number: "9876543210".to_string(),
            status: "Paid".to_string(),
            payment_mode: "CASH".to_string(),
            total_amount: "100.00".to_string(),
            discount_amount: "0.00".to_string(),
            invoice_date: "10 Jun 2024".to_string(),
        },
        ReportRow {
            s_no: 2,
            invoice_number: "INV1EF56GH78".to_string(),
            customer_number: "N/A".to_string(),
            status: "Unpaid".to_string(),
            payment_mode: "UPI".to_string(),
            total_amount: "1,250.50".to_string(),
            discount_amount: "50.00".to_string(),
            invoice_date: "11 Jun 2024".to_string(),
        },
        ReportRow {
            s_no: 3,
            invoice_number: "INV1IJ90KL12".to_string(),
            customer_number: "9123456780".to_string(),
            status: "Canceled".to_string(),
            payment_mode: "N/A".to_string(),
            total_amount: "25.00".to_string(),
            discount_amount: "0.00".to_string(),
            invoice_date: "12 Jun 2024".to_string(),
        },
    ];

    #[allow(clippy::unwrap_used)]
    let (from_date, to_date) = (
        NaiveDate::parse_from_str("2024-06-01", "%Y-%m-%d").unwrap(),
        NaiveDate::parse_from_str("2024-06-30", "%Y-%m-%d").unwrap(),
    );

    ReportModel {
        business_name: "Test Traders".to_string(),
        gst_number: Some("22AAAAA0000A1Z5".to_string()),
        from_date,
        to_date,
        rows,
        summary: ReportSummary {
            total_invoices: 3,
            total_amount: "1,375.50".to_string(),
            total_discount: "50.00".to_string(),
            paid_count: 1,
            unpaid_count: 1,
            canceled_count: 1,
        },
    }
}
