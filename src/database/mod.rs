pub mod drink;
pub mod repository;

pub use drink::{Drink, DrinkDetail, DrinkSummary, Ingredient, IngredientSummary};
pub use repository::{DatabaseError, DrinkRepository};

use sqlx::PgPool;

/// Create the drinks table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS drinks (\
            id BIGSERIAL PRIMARY KEY, \
            title TEXT NOT NULL UNIQUE, \
            recipe TEXT NOT NULL\
         )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Pings the pool to ensure connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
