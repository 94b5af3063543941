use crate::domain::error::CatalogError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

pub type ErrorResponse = (StatusCode, Json<ApiResponse>);

pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::Validation { .. } | CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &CatalogError) -> ErrorResponse {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(error = ?err, "request failed");
    }
    let data = match err {
        CatalogError::Validation { field, reason } => Some(serde_json::json!({
            "field": field,
            "reason": reason,
        })),
        CatalogError::NotFound(id) => Some(serde_json::json!({ "id": id })),
        _ => None,
    };
    (status, Json(ApiResponse::failure(err.to_string(), data)))
}

/// Malformed body or query string.
pub fn rejection_400(err: impl std::fmt::Display, expected: &str) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure(
            format!("Invalid request: {} (expected: {})", err, expected),
            None,
        )),
    )
}

pub fn ok_json<T: Serialize>(value: &T) -> Result<(StatusCode, Json<ApiResponse>), ErrorResponse> {
    let data = serde_json::to_value(value)
        .map_err(|e| error_response(&CatalogError::Store(anyhow::Error::new(e))))?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(data))))
}
