//! Report endpoint: `POST /invoice/generate`.
//!
//! Validates the requested format and date range (collecting every problem
//! into one response), aggregates the tenant's invoices, renders the bytes in
//! the requested format, and returns them base64-encoded. The caller picks
//! the MIME type from the format it asked for.

use crate::{
    api::{AppState, authenticated_user_id},
    core::{invoice::business_id_for_user, report},
    errors::Error,
    render,
};
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::info;

/// `POST /invoice/generate` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportBody {
    format: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
}

/// `POST /invoice/generate` - renders a date-range report for the tenant.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GenerateReportBody>,
) -> Result<impl IntoResponse, Error> {
    let user_id = authenticated_user_id(&headers)?;
    let business_id = business_id_for_user(&state.db, user_id).await?;

    let request = report::validate_request(
        body.format.as_deref(),
        business_id,
        body.from_date.as_deref(),
        body.to_date.as_deref(),
    )?;

    let model = report::aggregate(&state.db, business_id, request.from_date, request.to_date)
        .await?;
    let bytes = render::render(request.format, &model)?;

    info!(
        business_id,
        format = ?request.format,
        invoices = model.summary.total_invoices,
        bytes = bytes.len(),
        "report rendered"
    );

    Ok(STANDARD.encode(bytes))
}
