//! Invoice line item entity - A weak entity owned by exactly one invoice.
//!
//! Line items are bulk-inserted atomically alongside their parent invoice and
//! never mutated afterwards. `product_name` is denormalized free text rather
//! than a foreign key so historical invoices survive catalog edits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// GST split variant applied to a line item.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GstType {
    /// Central + state GST (intra-state sale)
    #[sea_orm(string_value = "cgst/sgst")]
    #[serde(rename = "cgst/sgst")]
    CgstSgst,
    /// Integrated GST (inter-state sale)
    #[sea_orm(string_value = "igst")]
    #[serde(rename = "igst")]
    Igst,
}

impl GstType {
    /// Parses the wire representation (`"cgst/sgst"`, `"igst"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cgst/sgst" => Some(Self::CgstSgst),
            "igst" => Some(Self::Igst),
            _ => None,
        }
    }
}

/// Invoice line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The invoice this line belongs to
    pub invoice_id: i64,
    /// Product name as sold, denormalized from the catalog
    pub product_name: String,
    /// Units sold; always positive
    pub quantity: i64,
    /// Unit price; never negative
    pub rate: f64,
    /// GST split variant, carried for record-keeping
    pub gst_type: Option<GstType>,
    /// GST rate in percent, carried for record-keeping
    pub gst_percentage: Option<f64>,
}

/// Defines relationships between line items and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
