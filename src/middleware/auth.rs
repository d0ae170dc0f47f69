use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{check_permission, AuthError};
use crate::error::ApiError;
use crate::AppState;

/// Per-route permission middleware: verify the bearer token, check that the
/// claims grant the required permission, then hand the verified claims to
/// the handler via a request extension.
///
/// Attach with `middleware::from_fn_with_state((state, "post:drinks"), require_permission)`.
pub async fn require_permission(
    State((state, permission)): State<(AppState, &'static str)>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match headers.get(header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedToken)?),
    };

    let claims = state.verifier.verify_header(header)?;
    check_permission(permission, &claims)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
