use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{RecipeId, UserId};

/// A user's favorite mark on a recipe (at most one per pair)
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Favorite {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Insert the mark; returns None if it already existed
    pub async fn create_if_absent(
        user_id: UserId,
        recipe_id: RecipeId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recipe_favorites (user_id, recipe_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, recipe_id) DO NOTHING
             RETURNING *",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns true if a mark was removed
    pub async fn delete(user_id: UserId, recipe_id: RecipeId, pool: &PgPool) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM recipe_favorites WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_recipe(recipe_id: RecipeId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_favorites WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
