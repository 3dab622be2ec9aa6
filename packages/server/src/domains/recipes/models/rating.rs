use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{RecipeId, UserId};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Star rating, one per user and recipe (re-rating overwrites)
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Rating {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    pub async fn upsert(
        user_id: UserId,
        recipe_id: RecipeId,
        rating: i16,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recipe_ratings (user_id, recipe_id, rating)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, recipe_id)
             DO UPDATE SET rating = EXCLUDED.rating, updated_at = NOW()
             RETURNING *",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(rating)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub fn is_valid(rating: i16) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}
