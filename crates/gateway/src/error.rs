//! Error types for the gateway layer

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use circle_users::UserError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const BLOB_STORE_ERROR_MESSAGE: &str = "Image upload failed";

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("{0}")]
    NotFound(String),

    #[error("You can't follow yourself")]
    SelfAction,

    /// Provider details are logged, never returned.
    #[error("Image upload failed: {0}")]
    BlobStore(String),

    #[error("Image uploads are not available")]
    BlobStoreUnavailable,

    #[error("User not authenticated")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Details are logged, never returned.
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_)
            | GatewayError::SelfAction
            | GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::AuthenticationFailed | GatewayError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::BlobStore(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BlobStoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "validation_error",
            GatewayError::Conflict(_) => "conflict",
            GatewayError::AuthenticationFailed => "authentication_failed",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::SelfAction => "self_action",
            GatewayError::BlobStore(_) => "blob_store_error",
            GatewayError::BlobStoreUnavailable => "blob_store_unavailable",
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::PayloadTooLarge(_) => "payload_too_large",
            GatewayError::InternalError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            GatewayError::InternalError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            GatewayError::BlobStore(_) => BLOB_STORE_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            GatewayError::InternalError(details) => {
                error!(error = %details, "request failed with internal error");
            }
            GatewayError::BlobStore(details) => {
                error!(error = %details, "image upload to blob store failed");
            }
            _ => {}
        }

        let error_response = json!({
            "success": false,
            "error": self.code(),
            "message": self.client_message(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<UserError> for GatewayError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::Validation(msg) => GatewayError::Validation(msg),
            UserError::Conflict(msg) => GatewayError::Conflict(msg),
            UserError::Authentication => GatewayError::AuthenticationFailed,
            UserError::NotFound(msg) => GatewayError::NotFound(msg),
            UserError::SelfAction => GatewayError::SelfAction,
            UserError::BlobStore(msg) => GatewayError::BlobStore(msg),
            UserError::BlobStoreUnavailable => GatewayError::BlobStoreUnavailable,
            UserError::InvalidToken(_) => GatewayError::Unauthorized,
            UserError::TokenCreationFailed(msg) | UserError::Persistence(msg) => {
                GatewayError::InternalError(msg)
            }
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        from_multipart_status(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for GatewayError {
    fn from(error: MultipartError) -> Self {
        from_multipart_status(error.status(), error.body_text())
    }
}

fn from_multipart_status(status: StatusCode, message: String) -> GatewayError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(message)
    } else {
        GatewayError::InvalidRequest(message)
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::InternalError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: GatewayError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn user_errors_map_to_status_and_code() {
        let cases = [
            (UserError::validation("bad"), StatusCode::BAD_REQUEST, "validation_error"),
            (UserError::Conflict("dup".into()), StatusCode::CONFLICT, "conflict"),
            (UserError::Authentication, StatusCode::UNAUTHORIZED, "authentication_failed"),
            (UserError::user_not_found(), StatusCode::NOT_FOUND, "not_found"),
            (UserError::SelfAction, StatusCode::BAD_REQUEST, "self_action"),
            (UserError::BlobStore("x".into()), StatusCode::BAD_GATEWAY, "blob_store_error"),
            (
                UserError::BlobStoreUnavailable,
                StatusCode::SERVICE_UNAVAILABLE,
                "blob_store_unavailable",
            ),
            (UserError::InvalidToken("x".into()), StatusCode::UNAUTHORIZED, "unauthorized"),
            (
                UserError::Persistence("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (user_error, status, code) in cases {
            let error = GatewayError::from(user_error);
            assert_eq!(error.status_code(), status);
            assert_eq!(error.code(), code);
        }
    }

    #[tokio::test]
    async fn error_body_has_success_flag_code_and_message() {
        let (status, body) = body_json(GatewayError::Conflict("Email already exists".into())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], "Email already exists");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let (status, body) =
            body_json(GatewayError::InternalError("disk I/O error on users.db".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("users.db"));
    }

    #[tokio::test]
    async fn blob_store_error_hides_provider_details() {
        let upstream = circle_users::BlobStoreError::Request(
            "error sending request for url (https://api.cloudinary.com/v1_1/acme-prod/image/upload)"
                .into(),
        );
        let (status, body) = body_json(GatewayError::from(UserError::from(upstream))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "blob_store_error");
        assert_eq!(body["message"], "Image upload failed");
        assert!(!body.to_string().contains("acme-prod"));
        assert!(!body.to_string().contains("cloudinary"));
    }

    #[test]
    fn oversized_multipart_maps_to_payload_too_large() {
        let error = from_multipart_status(StatusCode::PAYLOAD_TOO_LARGE, "too big".into());
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.code(), "payload_too_large");

        let error = from_multipart_status(StatusCode::BAD_REQUEST, "bad boundary".into());
        assert_eq!(error.code(), "invalid_request");
    }
}
