//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::StoreError;

/// Application-level error that maps to HTTP responses.
///
/// Completion failures never reach this type; the relay answers them in-band.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Store(StoreError::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Message storage is temporarily unavailable",
            ),
            AppError::Store(StoreError::Corrupt(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_CORRUPT",
                "Stored conversation data could not be read",
            ),
        };

        // Driver detail can name database paths; it stays in the logs.
        let AppError::Store(detail) = &self;
        tracing::error!(code, error = %detail, "Request failed");

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_503() {
        let resp = AppError::from(StoreError::Unavailable("locked".into())).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_corrupt_is_500() {
        let resp = AppError::from(StoreError::Corrupt("bad role".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_body_hides_driver_detail() {
        let resp = AppError::from(StoreError::Unavailable(
            "unable to open database file: /home/alice/.chatrelay/chatrelay.db".into(),
        ))
        .into_response();

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "STORAGE_UNAVAILABLE");
        assert_eq!(
            body["error"]["message"],
            "Message storage is temporarily unavailable"
        );
        assert!(!String::from_utf8_lossy(&bytes).contains(".chatrelay"));
    }
}
