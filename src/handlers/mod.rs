pub mod drinks;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

/// JSON body extractor whose rejection conforms to the uniform error
/// envelope instead of the framework default.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("bad request"))?;
        Ok(JsonBody(value))
    }
}

/// GET / - Service description
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Drinks API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "drinks": "GET /drinks (public)",
                "drinks_detail": "GET /drinks-detail (requires get:drinks-detail)",
                "create": "POST /drinks (requires post:drinks)",
                "update": "PATCH /drinks/:id (requires patch:drinks)",
                "delete": "DELETE /drinks/:id (requires delete:drinks)",
            }
        }
    }))
}

/// GET /health - Liveness plus database connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": 503,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
