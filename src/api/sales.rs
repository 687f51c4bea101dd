//! Sales analytics endpoint: `GET /sales`.

use crate::{
    api::{AppState, authenticated_user_id},
    core::{invoice::business_id_for_user, sales},
    errors::Error,
};
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

/// `GET /sales` query parameters.
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    period: Option<String>,
}

/// `GET /sales` - period-windowed revenue totals and chart buckets for the
/// tenant. The period defaults to `week`.
pub async fn analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, Error> {
    let user_id = authenticated_user_id(&headers)?;
    let business_id = business_id_for_user(&state.db, user_id).await?;

    let raw_period = query.period.as_deref().unwrap_or("week");
    let period = sales::SalesPeriod::parse(raw_period).ok_or_else(|| Error::Validation {
        errors: vec!["period must be one of: today, week, month, 3months, 6months".to_string()],
    })?;

    let report = sales::aggregate_sales(&state.db, business_id, period, Utc::now()).await?;

    Ok(Json(json!({
        "status": true,
        "data": {
            "totalSales": report.total_sales,
            "previousTotalSales": report.previous_total_sales,
            "data": report.data,
            "period": report.period.as_str(),
            "dateRange": {
                "current": {
                    "from": report.range.start.format("%Y-%m-%d").to_string(),
                    "to": report.range.end.format("%Y-%m-%d").to_string(),
                },
                "previous": {
                    "from": report.range.previous_start.format("%Y-%m-%d").to_string(),
                    "to": report.range.previous_end.format("%Y-%m-%d").to_string(),
                },
            },
        },
    })))
}
