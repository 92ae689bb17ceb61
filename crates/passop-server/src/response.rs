//! JSON response envelopes and error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use passop_core::VaultError;

/// Successful mutation envelope: `{ "success": true, "result": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Client message for any unreadable request body
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Failure returned to the client; details stay in the server log
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: VaultError,
    },
}

impl ApiError {
    /// Wrap a core error under the endpoint's generic client message
    pub fn internal(context: &'static str) -> impl FnOnce(VaultError) -> Self {
        move |source| Self::Internal { context, source }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => {
                warn!("Rejected request: {}", detail);
                (StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE.to_string())
            }
            ApiError::Internal { context, source } => {
                error!(storage = source.is_storage(), "{}: {}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let err = ApiError::internal("Error saving password")(VaultError::Storage(
            "disk /var/lib/passop full".to_string(),
        ));

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("disk /var/lib/passop full"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"success": false, "message": "Error saving password"})
        );
    }

    #[tokio::test]
    async fn test_bad_request_hides_detail() {
        let err = ApiError::BadRequest("missing field `password` at line 1 column 20".to_string());

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.contains("missing field"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"success": false, "message": INVALID_BODY_MESSAGE})
        );
    }

    #[test]
    fn test_ok_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, json!({"success": true, "result": 3}));
    }
}
