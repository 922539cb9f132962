//! Error responses.
//!
//! # Responsibilities
//! - Map controller failures to HTTP status codes
//! - Render error bodies as the status' plain-text reason phrase
//!
//! # Design Decisions
//! - Detailed causes are logged, never returned to the client
//! - 404 and 400 bodies are exactly `Not Found` and `Bad Request`

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;

use crate::transcode::TranscodeError;

/// Error returned by address controller operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("address not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::NotFound => tracing::debug!("Address not found"),
            ApiError::BadRequest(reason) => tracing::warn!(reason = %reason, "Rejected request"),
            ApiError::PayloadTooLarge => tracing::warn!("Rejected oversized body"),
            ApiError::Internal(reason) => tracing::error!(reason = %reason, "Request failed"),
        }

        let body = status.canonical_reason().unwrap_or_default();
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Every binding failure is a 400, except an oversized body.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<TranscodeError> for ApiError {
    fn from(err: TranscodeError) -> Self {
        match err {
            TranscodeError::Csv(_) | TranscodeError::FieldCount { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            TranscodeError::Write(_) | TranscodeError::Utf8(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Handler signature for [`CatchPanicLayer::custom`].
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turn a handler panic into a logged 500 instead of a dropped connection.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {message}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        assert_eq!(render(ApiError::NotFound).await, (StatusCode::NOT_FOUND, "Not Found".into()));
    }

    #[tokio::test]
    async fn test_bad_request_hides_reason() {
        let (status, body) = render(ApiError::BadRequest("line 3: oops".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Bad Request");
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        use axum::{body::Body, http::Request, routing::get, Router};
        use tower::ServiceExt;

        async fn explode() -> &'static str {
            panic!("store exploded");
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(catch_panic_layer());
        let request = Request::builder().uri("/explode").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Internal Server Error");
    }

    #[test]
    fn test_field_count_maps_to_bad_request() {
        let err: ApiError = TranscodeError::FieldCount { line: 2, found: 3 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
