//! Invoice number generation.
//!
//! Numbers follow the human-readable convention `INV{businessId}` plus a
//! random A-Z/0-9 suffix, with a total length uniformly drawn from 12 to 15
//! characters. Randomness alone makes uniqueness only probabilistic, so the
//! generator pairs a bounded retry loop with the unique index on
//! `invoices.invoice_number`: candidates already present in storage are
//! regenerated, and a commit-time collision from a concurrent writer still
//! fails loudly instead of issuing a duplicate.

use crate::{
    entities::{Invoice, invoice},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::warn;

/// Alphabet for the random suffix
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Minimum total invoice number length
const MIN_LEN: usize = 12;
/// Maximum total invoice number length
const MAX_LEN: usize = 15;
/// How many candidates to try before giving up
const MAX_ATTEMPTS: u32 = 5;

/// Generates one candidate invoice number for a business.
///
/// The prefix is `INV{business_id}`; the suffix is random alphanumeric. The
/// total length is uniform over `[max(12, prefix + 1), 15]`, so at least one
/// random character always follows the prefix. Fails when the business id is
/// so long the prefix leaves no room under the 15-character cap.
pub fn candidate(business_id: i64) -> Result<String> {
    let prefix = format!("INV{business_id}");
    if prefix.len() >= MAX_LEN {
        return Err(Error::InvoiceNumberOverflow {
            business_id,
            max_len: MAX_LEN,
        });
    }

    let mut rng = rand::rng();
    let lower = MIN_LEN.max(prefix.len() + 1);
    let total_len = rng.random_range(lower..=MAX_LEN);

    let mut number = prefix;
    while number.len() < total_len {
        let index = rng.random_range(0..CHARSET.len());
        number.push(char::from(CHARSET[index]));
    }

    Ok(number)
}

/// Generates an invoice number not currently present in storage.
///
/// Regenerates on collision up to a small bound; the unique column index
/// remains the hard guarantee against a race between concurrent creations.
pub async fn generate_unique(db: &DatabaseConnection, business_id: i64) -> Result<String> {
    for attempt in 0..MAX_ATTEMPTS {
        let number = candidate(business_id)?;

        let taken = Invoice::find()
            .filter(invoice::Column::InvoiceNumber.eq(&number))
            .count(db)
            .await?
            > 0;

        if taken {
            warn!(attempt, %number, "invoice number collision, regenerating");
            continue;
        }

        return Ok(number);
    }

    Err(Error::InvoiceNumberExhausted {
        attempts: MAX_ATTEMPTS,
    })
}
