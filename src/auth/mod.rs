//! Bearer-token verification and permission enforcement.
//!
//! Tokens are RS256 JWTs issued by an external identity provider and
//! verified against the provider's signing-key set (see [`keys`]). Each
//! failure mode carries a stable machine-readable code and HTTP status so
//! callers can distinguish a missing header from a stale token from an
//! insufficient permission.

pub mod keys;

use axum::http::StatusCode;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use keys::{Jwk, Jwks, KeySet};

/// Verified token payload. Produced fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("{0}")]
    InvalidHeader(String),

    #[error("Signature verification failed.")]
    InvalidSignature,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionNotFound,

    #[error("Unable to parse authentication token.")]
    MalformedToken,
}

impl AuthError {
    /// Stable machine-readable code, as documented by the identity provider.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) | AuthError::MalformedToken => "invalid_header",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionNotFound => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::InvalidHeader(_)
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::PermissionNotFound => StatusCode::FORBIDDEN,
            AuthError::PermissionsMissing | AuthError::MalformedToken => StatusCode::BAD_REQUEST,
        }
    }
}

/// Validates inbound bearer tokens against an immutable signing-key set.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: KeySet,
    audience: String,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(keys: KeySet, audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Verify a raw `Authorization` header value and return the claims.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let raw = header.ok_or(AuthError::HeaderMissing)?;
        let token = extract_bearer_token(raw)?;
        self.verify(token)
    }

    /// Verify a bare token: signing key lookup, signature, expiry, claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidHeader("Authorization malformed.".to_string()))?;

        let key = self.keys.get(&kid).ok_or_else(|| {
            AuthError::InvalidHeader("Unable to find the appropriate key.".to_string())
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, key, &validation).map_err(map_decode_error)?;
        Ok(data.claims)
    }
}

/// Split the `Authorization` header into its scheme and token parts.
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        (Some("Bearer"), None, _) => {
            Err(AuthError::InvalidHeader("Token not found.".to_string()))
        }
        (Some("Bearer"), Some(_), Some(_)) => Err(AuthError::InvalidHeader(
            "Authorization header must be a bearer token.".to_string(),
        )),
        _ => Err(AuthError::InvalidHeader(
            "Authorization header must start with \"Bearer\".".to_string(),
        )),
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::InvalidClaims,
        _ => AuthError::MalformedToken,
    }
}

/// Check that the verified claims grant the required permission string.
///
/// Pure set-membership test; no wildcard or hierarchical semantics.
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if !permissions.iter().any(|p| p == required) {
        return Err(AuthError::PermissionNotFound);
    }

    Ok(())
}
