//! Invoice business logic - creation, listing, and status transitions.
//!
//! Creation is the one write path in the subsystem and is strictly atomic: the
//! invoice header and its line items either all persist or none do. Readers
//! never observe a header without its items. Listing is offset-paginated and
//! sortable; status changes go through the defensive state machine on
//! [`InvoiceStatus`] even though no HTTP route currently drives them.

use crate::{
    core::{calculator, calculator::NewInvoiceItem, invoice_number},
    entities::{Invoice, InvoiceStatus, PaymentMode, User, invoice, invoice_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    DatabaseConnection, DatabaseTransaction, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait, prelude::*,
};
use serde::Deserialize;
use tracing::{error, info};

/// An invoice creation request, before validation.
///
/// `status` and `payment_mode` arrive as raw strings so that bad values are
/// accumulated into the validation report instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    /// Requested settlement state (`"paid"`, `"unpaid"`, `"canceled"`)
    pub status: Option<String>,
    /// Customer phone number, if captured
    pub customer_number: Option<String>,
    /// Settlement channel (`"cash"`, `"card"`, `"upi"`)
    pub payment_mode: Option<String>,
    /// Flat discount amount; absent means zero
    pub discount: Option<f64>,
    /// Line items; must be non-empty
    #[serde(default)]
    pub items: Vec<NewInvoiceItem>,
}

/// How a listing should be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first (the default)
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Largest total first
    AmountHighToLow,
    /// Smallest total first
    AmountLowToHigh,
}

impl SortOrder {
    /// Parses a `sortBy` query value; anything unrecognized falls back to
    /// newest-first rather than erroring.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("date_asc") => Self::DateAsc,
            Some("amount_high_to_low") => Self::AmountHighToLow,
            Some("amount_low_to_high") => Self::AmountLowToHigh,
            _ => Self::DateDesc,
        }
    }
}

/// Offset pagination metadata returned alongside a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of pages for the current filter
    pub total_pages: u64,
    /// Whether another page follows the requested one
    pub has_next: bool,
}

/// Resolves the business a user belongs to, the tenant scope for every
/// invoice operation.
pub async fn business_id_for_user(db: &DatabaseConnection, user_id: i64) -> Result<i64> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "User" })?;
    Ok(user.business_id)
}

/// Creates an invoice and its line items atomically.
///
/// Validation (status, payment mode, every line item, discount) runs eagerly
/// and exhaustively before anything else; all problems come back in one
/// [`Error::Validation`] list, and a malformed payload is reported as such
/// even when the caller is unknown. The tenant lookup follows validation,
/// then the header insert precedes the bulk line-item insert inside a single
/// database transaction, and any failure after the transaction opens triggers
/// an explicit rollback. A rollback failure is logged but never masks the
/// original error.
pub async fn create_invoice(
    db: &DatabaseConnection,
    user_id: i64,
    request: NewInvoice,
) -> Result<invoice::Model> {
    let mut errors = Vec::new();

    let status = match request.status.as_deref() {
        Some(raw) => match InvoiceStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                errors.push("status must be one of: paid, unpaid, canceled".to_string());
                None
            }
        },
        None => {
            errors.push("status is required".to_string());
            None
        }
    };

    let payment_mode = match request.payment_mode.as_deref() {
        Some(raw) => match PaymentMode::parse(raw) {
            Some(mode) => Some(mode),
            None => {
                errors.push("paymentMode must be one of: cash, card, upi".to_string());
                None
            }
        },
        None => {
            errors.push("paymentMode is required".to_string());
            None
        }
    };

    let totals = match calculator::compute_totals(&request.items, request.discount) {
        Ok(totals) => Some(totals),
        Err(mut item_errors) => {
            errors.append(&mut item_errors);
            None
        }
    };

    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }

    // Validated above; the None arms pushed errors and returned already
    let (Some(status), Some(payment_mode), Some(totals)) = (status, payment_mode, totals) else {
        return Err(Error::Validation {
            errors: vec!["Invalid data format".to_string()],
        });
    };

    let business_id = business_id_for_user(db, user_id).await?;
    let invoice_number = invoice_number::generate_unique(db, business_id).await?;

    let txn = db.begin().await?;

    let outcome = insert_invoice_rows(
        &txn,
        business_id,
        user_id,
        &invoice_number,
        &request,
        status,
        payment_mode,
        totals.total_amount,
    )
    .await;

    match outcome {
        Ok(model) => {
            txn.commit().await?;
            info!(
                invoice_id = model.id,
                business_id,
                %model.invoice_number,
                total_amount = model.total_amount,
                "invoice created"
            );
            Ok(model)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!(error = %rollback_err, "rollback failed after invoice insert error");
            }
            Err(err)
        }
    }
}

/// Inserts the invoice header followed by its line items inside `txn`.
/// The header goes first; the line items reference its freshly assigned id.
#[allow(clippy::too_many_arguments)]
async fn insert_invoice_rows(
    txn: &DatabaseTransaction,
    business_id: i64,
    user_id: i64,
    invoice_number: &str,
    request: &NewInvoice,
    status: InvoiceStatus,
    payment_mode: PaymentMode,
    total_amount: f64,
) -> Result<invoice::Model> {
    let now = Utc::now();

    let header = invoice::ActiveModel {
        business_id: Set(business_id),
        user_id: Set(user_id),
        invoice_number: Set(invoice_number.to_string()),
        customer_number: Set(request.customer_number.clone()),
        total_amount: Set(total_amount),
        discount_amount: Set(request.discount.unwrap_or(0.0)),
        payment_mode: Set(Some(payment_mode)),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let items: Vec<invoice_item::ActiveModel> = request
        .items
        .iter()
        .map(|item| invoice_item::ActiveModel {
            invoice_id: Set(header.id),
            product_name: Set(item.product_name.clone().unwrap_or_default()),
            quantity: Set(item.quantity.unwrap_or_default()),
            rate: Set(item.rate.unwrap_or_default()),
            gst_type: Set(item.gst_type.as_deref().and_then(crate::entities::GstType::parse)),
            gst_percentage: Set(item.gst_percentage),
            ..Default::default()
        })
        .collect();

    invoice_item::Entity::insert_many(items).exec(txn).await?;

    Ok(header)
}

/// Retrieves one page of a business's invoices.
///
/// `page` is zero-based; `offset = page * limit`. `total_pages` is
/// `ceil(count / limit)` and `has_next` tells the client whether a further
/// page exists, so it never has to probe past the end.
pub async fn list_invoices(
    db: &DatabaseConnection,
    business_id: i64,
    page: u64,
    limit: u64,
    sort: SortOrder,
) -> Result<(Vec<invoice::Model>, Pagination)> {
    let limit = limit.max(1);

    let filter = Invoice::find().filter(invoice::Column::BusinessId.eq(business_id));

    let total_count = filter.clone().count(db).await?;

    let query = match sort {
        SortOrder::DateDesc => filter.order_by_desc(invoice::Column::CreatedAt),
        SortOrder::DateAsc => filter.order_by_asc(invoice::Column::CreatedAt),
        SortOrder::AmountHighToLow => filter.order_by_desc(invoice::Column::TotalAmount),
        SortOrder::AmountLowToHigh => filter.order_by_asc(invoice::Column::TotalAmount),
    };

    let rows = query
        .offset(page.saturating_mul(limit))
        .limit(limit)
        .all(db)
        .await?;

    let total_pages = total_count.div_ceil(limit);
    let has_next = page + 1 < total_pages;

    Ok((rows, Pagination {
        total_pages,
        has_next,
    }))
}

/// Retrieves the line items belonging to one invoice of a business.
pub async fn list_invoice_items(
    db: &DatabaseConnection,
    business_id: i64,
    invoice_id: i64,
) -> Result<Vec<invoice_item::Model>> {
    let header = Invoice::find_by_id(invoice_id)
        .filter(invoice::Column::BusinessId.eq(business_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Invoice" })?;

    invoice_item::Entity::find()
        .filter(invoice_item::Column::InvoiceId.eq(header.id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves an invoice to a new settlement state, enforcing the state machine.
///
/// Illegal transitions (reviving a canceled invoice, un-paying a paid one)
/// are rejected with a validation error. No HTTP route drives this today;
/// it exists so future cancel/settle flows cannot corrupt historical data.
pub async fn transition_status(
    db: &DatabaseConnection,
    invoice_id: i64,
    next: InvoiceStatus,
) -> Result<invoice::Model> {
    let current = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Invoice" })?;

    if !current.status.can_transition_to(next) {
        return Err(Error::Validation {
            errors: vec![format!(
                "cannot transition invoice from {} to {}",
                current.status.as_str(),
                next.as_str()
            )],
        });
    }

    let mut active: invoice::ActiveModel = current.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}
