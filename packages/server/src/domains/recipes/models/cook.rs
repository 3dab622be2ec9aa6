use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{RecipeId, UserId};

/// "I cooked this" mark; a user may cook a recipe many times
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Cook {
    pub id: Uuid,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub created_at: DateTime<Utc>,
}

impl Cook {
    pub async fn create(user_id: UserId, recipe_id: RecipeId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recipe_cooks (id, user_id, recipe_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_recipe(recipe_id: RecipeId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_cooks WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}
