pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::TokenVerifier;
use config::AppConfig;
use handlers::drinks;
use middleware::require_permission;

/// Shared per-process state: immutable configuration, the signing-key
/// verifier, and the store connection pool. Constructed once at startup
/// and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool, verifier: TokenVerifier) -> Self {
        Self {
            config: Arc::new(config),
            pool,
            verifier: Arc::new(verifier),
        }
    }
}

/// Build the application router. Protected routes compose the permission
/// middleware per route; public routes skip it entirely.
pub fn app(state: AppState) -> Router {
    use axum::handler::Handler;

    let require = |permission: &'static str| {
        from_fn_with_state((state.clone(), permission), require_permission)
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/drinks",
            get(drinks::list).post(drinks::create.layer(require("post:drinks"))),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_detail.layer(require("get:drinks-detail"))),
        )
        .route(
            "/drinks/:id",
            patch(drinks::update.layer(require("patch:drinks")))
                .delete(drinks::delete.layer(require("delete:drinks"))),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
