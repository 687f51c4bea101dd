//! Invoice entity - The header row of an issued invoice.
//!
//! An invoice is created once per checkout, atomically with its line items,
//! and is never edited afterwards. `total_amount` always equals the sum of
//! line subtotals minus `discount_amount`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement state of an invoice.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Fully settled at checkout
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Issued but not yet settled
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Voided; kept for the audit trail
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl InvoiceStatus {
    /// Parses the wire representation (`"paid"`, `"unpaid"`, `"canceled"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::Canceled => "canceled",
        }
    }

    /// Capitalized label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::Canceled => "Canceled",
        }
    }

    /// Whether a status change is a legal transition.
    ///
    /// The state machine is `unpaid -> paid -> canceled`, with a direct
    /// `unpaid -> canceled` shortcut for voiding an unsettled invoice.
    /// Canceled is terminal and self-transitions are rejected.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unpaid, Self::Paid | Self::Canceled) | (Self::Paid, Self::Canceled)
        )
    }
}

/// How the customer settled the invoice.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash payment
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Card payment
    #[sea_orm(string_value = "card")]
    Card,
    /// UPI transfer
    #[sea_orm(string_value = "upi")]
    Upi,
}

impl PaymentMode {
    /// Parses the wire representation (`"cash"`, `"card"`, `"upi"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            _ => None,
        }
    }

    /// Upper-cased label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Upi => "UPI",
        }
    }
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The business that issued this invoice
    pub business_id: i64,
    /// The user who created this invoice
    pub user_id: i64,
    /// Human-readable invoice number, unique across all tenants
    #[sea_orm(unique)]
    pub invoice_number: String,
    /// Customer phone number, when captured at checkout
    pub customer_number: Option<String>,
    /// Grand total: sum of line subtotals minus `discount_amount`
    pub total_amount: f64,
    /// Flat discount applied to the invoice total
    pub discount_amount: f64,
    /// Settlement channel; nullable because rows predating the field exist
    pub payment_mode: Option<PaymentMode>,
    /// Settlement state
    pub status: InvoiceStatus,
    /// When the invoice was issued
    pub created_at: DateTimeUtc,
    /// Last modification (status transitions only)
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one business
    #[sea_orm(
        belongs_to = "super::business::Entity",
        from = "Column::BusinessId",
        to = "super::business::Column::Id"
    )]
    Business,
    /// Each invoice belongs to the user who created it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// An invoice owns its line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    InvoiceItem,
}

impl Related<super::business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Business.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
