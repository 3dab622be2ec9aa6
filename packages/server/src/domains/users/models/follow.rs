use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::UserId;

/// Directed follow edge (follower → following)
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Follow {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Insert the edge; returns None if it already existed
    pub async fn create_if_absent(
        follower_id: UserId,
        following_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO follows (follower_id, following_id)
             VALUES ($1, $2)
             ON CONFLICT (follower_id, following_id) DO NOTHING
             RETURNING *",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns true if an edge was removed
    pub async fn delete(follower_id: UserId, following_id: UserId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(follower_id)
            .bind(following_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_follower_ids(following_id: UserId, pool: &PgPool) -> Result<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT follower_id FROM follows WHERE following_id = $1 ORDER BY created_at",
        )
        .bind(following_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
