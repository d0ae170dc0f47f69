//! Drink menu endpoints.
//!
//! Public summary listing, permission-gated detail listing, and the three
//! mutations. Every mutation runs in a single transaction inside the
//! repository; a fault during the attempt rolls back and reports 422.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Claims;
use crate::database::{Drink, DrinkRepository, Ingredient};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::JsonBody;

/// Request body for POST and PATCH. Both fields optional so PATCH can
/// apply a partial update; POST enforces presence itself.
#[derive(Debug, Deserialize)]
pub struct DrinkBody {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

/// GET /drinks - Public summary listing
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let repository = DrinkRepository::new(state.pool.clone());
    let drinks = repository.select_all().await.map_err(|e| {
        tracing::warn!("listing drinks failed: {}", e);
        ApiError::bad_request("bad request")
    })?;

    if drinks.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "drinks": "None available at the moment"
        })));
    }

    let data = short_views(&drinks)?;
    Ok(Json(json!({ "success": true, "drinks": data })))
}

/// GET /drinks-detail - Detailed listing, requires get:drinks-detail
pub async fn list_detail(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let repository = DrinkRepository::new(state.pool.clone());
    let drinks = repository.select_all().await.map_err(|e| {
        tracing::warn!("listing drink detail failed: {}", e);
        ApiError::bad_request("bad request")
    })?;

    if drinks.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "drinks": "No detail available at the moment"
        })));
    }

    let data = long_views(&drinks)?;
    Ok(Json(json!({ "success": true, "drinks": data })))
}

/// POST /drinks - Create a drink, requires post:drinks
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<DrinkBody>,
) -> ApiResult<Json<Value>> {
    let (Some(title), Some(recipe)) = (body.title, body.recipe) else {
        return Err(ApiError::not_found("resource not found"));
    };

    let recipe_text =
        serde_json::to_string(&recipe).map_err(|_| ApiError::unprocessable("unprocessable"))?;

    let repository = DrinkRepository::new(state.pool.clone());
    let drink = repository.insert(&title, &recipe_text).await?;

    tracing::info!(sub = %claims.sub, id = drink.id, title = %drink.title, "created drink");

    let data = long_views(&[drink])?;
    Ok(Json(json!({ "success": true, "drinks": data })))
}

/// PATCH /drinks/:id - Partial update, requires patch:drinks
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<DrinkBody>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;

    let recipe_text = body
        .recipe
        .map(|r| serde_json::to_string(&r))
        .transpose()
        .map_err(|_| ApiError::unprocessable("unprocessable"))?;

    let repository = DrinkRepository::new(state.pool.clone());
    let drink = repository
        .update(id, body.title.as_deref(), recipe_text.as_deref())
        .await?;

    tracing::info!(sub = %claims.sub, id = drink.id, "updated drink");

    let data = long_views(&[drink])?;
    Ok(Json(json!({ "success": true, "drinks": data })))
}

/// DELETE /drinks/:id - Delete a drink, requires delete:drinks
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;

    let repository = DrinkRepository::new(state.pool.clone());
    repository.delete(id).await?;

    tracing::info!(sub = %claims.sub, id, "deleted drink");

    Ok(Json(json!({ "success": true, "delete": id })))
}

/// The id comes from the URL path; a non-integer path segment is treated
/// the same as a record that does not exist.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("resource not found"))
}

fn short_views(drinks: &[Drink]) -> Result<Vec<Value>, ApiError> {
    drinks
        .iter()
        .map(|d| d.short().and_then(|v| serde_json::to_value(v)))
        .collect::<Result<_, _>>()
        .map_err(stored_recipe_fault)
}

fn long_views(drinks: &[Drink]) -> Result<Vec<Value>, ApiError> {
    drinks
        .iter()
        .map(|d| d.long().and_then(|v| serde_json::to_value(v)))
        .collect::<Result<_, _>>()
        .map_err(stored_recipe_fault)
}

// Writes always serialize through the same encoder, so this only fires on
// internal inconsistency.
fn stored_recipe_fault(err: serde_json::Error) -> ApiError {
    tracing::error!("stored recipe failed to deserialize: {}", err);
    ApiError::internal("internal server error")
}
