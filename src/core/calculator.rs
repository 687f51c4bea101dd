//! Tax and amount calculator - Pure computation over invoice line items.
//!
//! Given the line items of a prospective invoice and an optional flat discount,
//! this module validates every field and computes the invoice totals. GST is
//! computed per line for record-keeping and reporting, but is NOT folded into
//! the grand total: issued totals are `sum(quantity * rate) - discount`.
//!
//! Validation here is exhaustive rather than fail-fast: every problem found is
//! collected into one list so the caller gets full diagnostics in a single
//! round trip.

use crate::entities::invoice_item::GstType;
use serde::Deserialize;

/// A line item as submitted by the client, before validation.
///
/// Every field is optional at this stage so that missing fields surface as
/// validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoiceItem {
    /// Product name as sold
    pub product_name: Option<String>,
    /// Units sold
    pub quantity: Option<i64>,
    /// Unit price
    pub rate: Option<f64>,
    /// GST split variant (`"cgst/sgst"` or `"igst"`)
    pub gst_type: Option<String>,
    /// GST rate in percent
    pub gst_percentage: Option<f64>,
}

/// Computed invoice amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Sum of `quantity * rate` over all lines
    pub subtotal: f64,
    /// Informational GST across all lines; not part of `total_amount`
    pub gst_amount: f64,
    /// `subtotal` minus the discount
    pub total_amount: f64,
}

/// Validates line items and the discount, and computes invoice totals.
///
/// Returns the computed [`Totals`] when everything is well-formed, otherwise
/// the complete list of validation messages. The discount is a flat amount,
/// not a percentage; when absent it is treated as zero. A non-finite discount
/// (the `NaN` that a lenient string parse can produce) is rejected here
/// rather than silently propagated into the stored total.
pub fn compute_totals(
    items: &[NewInvoiceItem],
    discount: Option<f64>,
) -> Result<Totals, Vec<String>> {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push("items must be a non-empty array".to_string());
    }

    let mut subtotal = 0.0;
    let mut gst_amount = 0.0;

    for (index, item) in items.iter().enumerate() {
        let mut line_ok = true;

        match &item.product_name {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                errors.push(format!("items[{index}].productName is required"));
                line_ok = false;
            }
        }

        match item.quantity {
            Some(quantity) if quantity > 0 => {}
            Some(_) => {
                errors.push(format!("items[{index}].quantity must be a positive integer"));
                line_ok = false;
            }
            None => {
                errors.push(format!("items[{index}].quantity is required"));
                line_ok = false;
            }
        }

        match item.rate {
            Some(rate) if rate.is_finite() && rate >= 0.0 => {}
            Some(_) => {
                errors.push(format!("items[{index}].rate must be a non-negative number"));
                line_ok = false;
            }
            None => {
                errors.push(format!("items[{index}].rate is required"));
                line_ok = false;
            }
        }

        if let Some(gst_type) = &item.gst_type {
            if GstType::parse(gst_type).is_none() {
                errors.push(format!(
                    "items[{index}].gstType must be one of: cgst/sgst, igst"
                ));
            }
        }

        if let Some(percentage) = item.gst_percentage {
            if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
                errors.push(format!(
                    "items[{index}].gstPercentage must be between 0 and 100"
                ));
            }
        }

        if line_ok {
            // Validated above: quantity and rate are present and in range
            let quantity = item.quantity.unwrap_or_default();
            let rate = item.rate.unwrap_or_default();

            #[allow(clippy::cast_precision_loss)]
            let line_subtotal = quantity as f64 * rate;
            subtotal += line_subtotal;

            if let Some(percentage) = item.gst_percentage {
                if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
                    gst_amount += line_subtotal * percentage / 100.0;
                }
            }
        }
    }

    let discount = match discount {
        None => 0.0,
        Some(value) if !value.is_finite() => {
            errors.push("discount must be a valid number".to_string());
            0.0
        }
        Some(value) if value < 0.0 => {
            errors.push("discount must not be negative".to_string());
            0.0
        }
        Some(value) => value,
    };

    if errors.is_empty() && discount > subtotal {
        errors.push("discount must not exceed the item subtotal".to_string());
    }

    if errors.is_empty() {
        Ok(Totals {
            subtotal,
            gst_amount,
            total_amount: subtotal - discount,
        })
    } else {
        Err(errors)
    }
}
