// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// All failures, including authorization failures, render as the uniform
/// envelope `{"success": false, "error": <status>, "message": <string>}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 / 403 / 400, status drawn from the specific auth failure kind
    Auth(AuthError),

    // 404 Not Found (also covers missing required body fields)
    NotFound(String),

    // 422 Unprocessable Entity (store-level fault on write)
    Unprocessable(String),

    // 500 Internal Server Error (internal-consistency faults)
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(err) => err.status(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::Auth(err) => err.to_string(),
        }
    }

    /// Convert to the uniform JSON error envelope.
    ///
    /// Auth errors additionally carry a stable machine-readable `code`,
    /// mirroring the shape the identity provider documents.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.status_code().as_u16(),
            "message": self.message(),
        });

        if let ApiError::Auth(err) = self {
            body["code"] = json!(err.code());
        }

        body
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        ApiError::Unprocessable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ApiError::not_found("resource not found"),
            DatabaseError::Sqlx(e) => {
                tracing::warn!("store fault: {}", e);
                ApiError::unprocessable("unprocessable")
            }
        }
    }
}

/// Convenience alias for handler return types.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_success_error_and_message() {
        let err = ApiError::not_found("resource not found");
        let body = err.to_json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!(404));
        assert_eq!(body["message"], json!("resource not found"));
        assert!(body.get("code").is_none());
    }

    #[test]
    fn auth_errors_carry_machine_code() {
        let err = ApiError::from(AuthError::HeaderMissing);
        let body = err.to_json();
        assert_eq!(body["error"], json!(401));
        assert_eq!(body["code"], json!("authorization_header_missing"));
        assert_eq!(body["message"], json!("Authorization header is expected."));
    }

    #[test]
    fn permission_failure_maps_to_403() {
        let err = ApiError::from(AuthError::PermissionNotFound);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_json()["code"], json!("unauthorized"));
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err = ApiError::from(DatabaseError::NotFound("drink 7".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
