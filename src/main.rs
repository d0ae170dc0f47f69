use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use drinks_api::auth::{KeySet, TokenVerifier};
use drinks_api::config::AppConfig;
use drinks_api::{app, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH0_DOMAIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting drinks API in {:?} mode", config.environment);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
        .connect(&config.database.url)
        .await?;

    database::ensure_schema(&pool).await?;

    // The key set is fetched once and held immutable for the process lifetime.
    let keys = KeySet::fetch(&config.auth.jwks_url()).await?;
    if keys.is_empty() {
        anyhow::bail!("no usable signing keys at {}", config.auth.jwks_url());
    }
    tracing::info!("loaded {} signing key(s)", keys.len());

    let verifier = TokenVerifier::new(keys, config.auth.audience.clone(), config.auth.issuer());
    let state = AppState::new(config, pool, verifier);
    let app = app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("drinks API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
