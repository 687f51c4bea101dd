//! Invoice endpoints: `POST /invoice` and `GET /invoice`.

use crate::{
    api::{AppState, authenticated_user_id},
    core::invoice::{NewInvoice, SortOrder, business_id_for_user, create_invoice, list_invoices},
    entities::invoice,
    errors::Error,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `POST /invoice` request body. `discount` is lenient: clients send it both
/// as a number and as a string, and an unparseable string degrades to `NaN`
/// so the calculator can report it alongside any other validation problems.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceBody {
    status: Option<String>,
    customer_number: Option<String>,
    payment_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    discount: Option<f64>,
    #[serde(default)]
    items: Vec<crate::core::calculator::NewInvoiceItem>,
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_f64().or(Some(f64::NAN)),
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(text.trim().parse().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    })
}

/// Invoice fields exposed over the wire. Internal fields (`user_id`,
/// `business_id`, `updated_at`) stay out of responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    id: i64,
    invoice_number: String,
    customer_number: Option<String>,
    total_amount: f64,
    discount_amount: f64,
    payment_mode: Option<crate::entities::PaymentMode>,
    status: crate::entities::InvoiceStatus,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<invoice::Model> for InvoiceDto {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            invoice_number: model.invoice_number,
            customer_number: model.customer_number,
            total_amount: model.total_amount,
            discount_amount: model.discount_amount,
            payment_mode: model.payment_mode,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// `POST /invoice` - creates an invoice with its line items atomically.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateInvoiceBody>,
) -> Result<impl IntoResponse, Error> {
    let user_id = authenticated_user_id(&headers)?;

    let request = NewInvoice {
        status: body.status,
        customer_number: body.customer_number,
        payment_mode: body.payment_mode,
        discount: body.discount,
        items: body.items,
    };

    let model = create_invoice(&state.db, user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Invoice created successfully",
            "status": true,
            "invoice": InvoiceDto::from(model),
        })),
    ))
}

/// `GET /invoice` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u64>,
    limit: Option<u64>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
}

/// `GET /invoice` - one page of the tenant's invoices, newest first by default.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let user_id = authenticated_user_id(&headers)?;
    let business_id = business_id_for_user(&state.db, user_id).await?;

    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);
    let sort = SortOrder::parse(query.sort_by.as_deref());

    let (rows, pagination) = list_invoices(&state.db, business_id, page, limit, sort).await?;
    let data: Vec<InvoiceDto> = rows.into_iter().map(Into::into).collect();

    Ok(Json(serde_json::json!({
        "data": data,
        "pagination": {
            "totalPage": pagination.total_pages,
            "hasNext": pagination.has_next,
        },
        "status": true,
    })))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_lenient_amount_accepts_number_and_string() {
        let body: CreateInvoiceBody =
            serde_json::from_str(r#"{"discount": 5}"#).unwrap();
        assert_eq!(body.discount, Some(5.0));

        let body: CreateInvoiceBody =
            serde_json::from_str(r#"{"discount": "5"}"#).unwrap();
        assert_eq!(body.discount, Some(5.0));

        let body: CreateInvoiceBody = serde_json::from_str(r"{}").unwrap();
        assert_eq!(body.discount, None);
    }

    #[test]
    fn test_lenient_amount_degrades_garbage_to_nan() {
        // The calculator turns this NaN into a collected validation message
        let body: CreateInvoiceBody =
            serde_json::from_str(r#"{"discount": "five"}"#).unwrap();
        assert!(body.discount.unwrap().is_nan());
    }

    #[test]
    fn test_invoice_dto_hides_internal_fields() {
        let model = invoice::Model {
            id: 1,
            business_id: 7,
            user_id: 3,
            invoice_number: "INV7ABCDEFG".to_string(),
            customer_number: None,
            total_amount: 15.0,
            discount_amount: 5.0,
            payment_mode: Some(crate::entities::PaymentMode::Cash),
            status: crate::entities::InvoiceStatus::Paid,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(InvoiceDto::from(model)).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("invoiceNumber"));
        assert!(object.contains_key("totalAmount"));
        assert!(!object.contains_key("userId"));
        assert!(!object.contains_key("businessId"));
        assert!(!object.contains_key("updatedAt"));
    }
}
