use sqlx::PgPool;
use thiserror::Error;

use crate::database::drink::Drink;

/// Errors from the drink store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Data access for the drinks table.
///
/// Every mutation runs in its own transaction. A transaction that is not
/// committed rolls back when dropped, and the checked-out connection returns
/// to the pool on every exit path.
pub struct DrinkRepository {
    pool: PgPool,
}

impl DrinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_all(&self) -> Result<Vec<Drink>, DatabaseError> {
        let drinks = sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(drinks)
    }

    pub async fn insert(&self, title: &str, recipe: &str) -> Result<Drink, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let drink = sqlx::query_as::<_, Drink>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(drink)
    }

    /// Partial update: only non-None fields change.
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> Result<Drink, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let drink = sqlx::query_as::<_, Drink>(
            "UPDATE drinks \
             SET title = COALESCE($2, title), recipe = COALESCE($3, recipe) \
             WHERE id = $1 \
             RETURNING id, title, recipe",
        )
        .bind(id)
        .bind(title)
        .bind(recipe)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("drink {}", id)))?;

        tx.commit().await?;
        Ok(drink)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("drink {}", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
