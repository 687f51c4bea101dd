//! Database configuration module.
//!
//! This module handles the `SQLite` database connection and table creation using
//! `SeaORM`. Schema comes straight from the entity definitions via
//! `Schema::create_table_from_entity`, so the database always matches the Rust
//! struct definitions without hand-written SQL. The connection is created here
//! and injected into the rest of the application; no module holds a global one.

use crate::entities::{Business, Invoice, InvoiceItem, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database described by `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Creates tables for businesses, users, invoices, and invoice line items.
/// The unique index on `invoices.invoice_number` backs the generator's
/// collision-retry loop with a hard storage-level guarantee.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut business_table = schema.create_table_from_entity(Business);
    business_table.if_not_exists();
    let mut user_table = schema.create_table_from_entity(User);
    user_table.if_not_exists();
    let mut invoice_table = schema.create_table_from_entity(Invoice);
    invoice_table.if_not_exists();
    let mut invoice_item_table = schema.create_table_from_entity(InvoiceItem);
    invoice_item_table.if_not_exists();

    db.execute(builder.build(&business_table)).await?;
    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&invoice_table)).await?;
    db.execute(builder.build(&invoice_item_table)).await?;

    Ok(())
}
