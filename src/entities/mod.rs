//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod business;
pub mod invoice;
pub mod invoice_item;
pub mod user;

// Re-export specific types to avoid conflicts
pub use business::{Column as BusinessColumn, Entity as Business, Model as BusinessModel};
pub use invoice::{
    Column as InvoiceColumn, Entity as Invoice, InvoiceStatus, Model as InvoiceModel, PaymentMode,
};
pub use invoice_item::{
    Column as InvoiceItemColumn, Entity as InvoiceItem, GstType, Model as InvoiceItemModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
