use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Pagination block attached to list responses. `prev_page`/`next_page`
/// serialize as explicit nulls at the page boundaries.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Meta {
    pub page: i64,
    pub limit: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl Meta {
    pub fn build(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            prev_page: (page > 1).then(|| page - 1),
            next_page: (page * limit < total).then(|| page + 1),
        }
    }
}

/// Uniform wire envelope. `data` and `meta` are omitted when absent.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            meta: None,
        }
    }
}

/// Failure taxonomy at the handler boundary. Every variant renders as the
/// `success: false` envelope; internal faults are logged and replaced with an
/// opaque message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = ApiResponse::<()> {
            success: false,
            message,
            data: None,
            meta: None,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_first_page() {
        let meta = Meta::build(1, 10, 25);
        assert_eq!(meta.prev_page, None);
        assert_eq!(meta.next_page, Some(2));
    }

    #[test]
    fn meta_middle_page() {
        let meta = Meta::build(2, 10, 25);
        assert_eq!(meta.prev_page, Some(1));
        assert_eq!(meta.next_page, Some(3));
    }

    #[test]
    fn meta_last_page() {
        let meta = Meta::build(3, 10, 25);
        assert_eq!(meta.prev_page, Some(2));
        assert_eq!(meta.next_page, None);
    }

    #[test]
    fn meta_exact_fit_has_no_next() {
        let meta = Meta::build(2, 10, 20);
        assert_eq!(meta.next_page, None);
    }

    #[test]
    fn envelope_omits_absent_data_and_meta() {
        let body = ApiResponse::<()>::message("Removed successfully");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn envelope_meta_serializes_nulls_at_boundaries() {
        let body =
            ApiResponse::new("ok", serde_json::json!([])).with_meta(Meta::build(1, 10, 5));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["meta"]["prev_page"].is_null());
        assert!(json["meta"]["next_page"].is_null());
    }
}
