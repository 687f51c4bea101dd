//! HTTP layer - axum routes and the error-to-response mapping.
//!
//! Handlers stay thin: they parse the request, call into [`crate::core`], and
//! shape the response envelope. Tenant identity arrives as the `x-user-id`
//! header, the seam where the out-of-scope auth middleware plugs in.

/// Invoice creation and listing handlers
pub mod invoice;
/// Report generation handler
pub mod report;
/// Sales analytics handler
pub mod sales;

use crate::errors::{Error, Result};
use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum::Json;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::error;

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
}

impl AppState {
    /// Creates the shared handler state around a database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/invoice", post(invoice::create).get(invoice::list))
        .route("/invoice/generate", post(report::generate))
        .route("/sales", get(sales::analytics))
        .with_state(state)
}

/// Reads the authenticated user id injected by the upstream auth middleware.
pub(crate) fn authenticated_user_id(headers: &HeaderMap) -> Result<i64> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::Validation {
            errors: vec!["a valid x-user-id header is required".to_string()],
        })
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Invalid data format",
                    "status": false,
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::ReportValidation { errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::NotFound { entity } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "message": format!("{entity} not found"),
                    "status": false,
                })),
            )
                .into_response(),
            err => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(internal_error_body(&err, detail_exposed())),
                )
                    .into_response()
            }
        }
    }
}

/// Whether 500 responses carry the underlying error detail. Production
/// deployments set `APP_ENV=production` to keep internals out of responses;
/// every other profile gets the detail for debugging.
fn detail_exposed() -> bool {
    std::env::var("APP_ENV").map_or(true, |value| value != "production")
}

fn internal_error_body(err: &Error, expose_detail: bool) -> serde_json::Value {
    let mut body = json!({
        "message": "Something went wrong",
        "status": false,
    });
    if expose_detail {
        body["error"] = json!(err.to_string());
    }
    body
}
