//! Business entity - A tenant of the billing platform.
//!
//! Every invoice and user is scoped to exactly one business. The invoice
//! subsystem only ever reads this table: `name` and `gst_number` feed the
//! report headers, nothing here is mutated by the core code paths.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business")]
pub struct Model {
    /// Unique identifier for the business
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Registered business name, shown on report headers
    pub name: String,
    /// GST registration number, if the business is GST-registered
    #[sea_orm(unique)]
    pub gst_number: Option<String>,
    /// Soft-delete / suspension flag
    pub is_active: bool,
    /// When the business registered
    pub created_at: DateTimeUtc,
    /// Last profile update
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Business and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A business has many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoice,
    /// A business has many users
    #[sea_orm(has_many = "super::user::Entity")]
    User,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
