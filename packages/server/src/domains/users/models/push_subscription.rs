use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{PushSubscriptionId, UserId};

/// Expo push token registered by one of the user's devices
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PushSubscription {
    pub id: PushSubscriptionId,
    pub user_id: UserId,
    pub expo_push_token: String,
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    /// Register a token; re-registering moves it to the given user
    pub async fn upsert(user_id: UserId, expo_push_token: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO push_subscriptions (id, user_id, expo_push_token)
             VALUES ($1, $2, $3)
             ON CONFLICT (expo_push_token) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING *",
        )
        .bind(PushSubscriptionId::new())
        .bind(user_id)
        .bind(expo_push_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM push_subscriptions WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete_by_token(expo_push_token: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE expo_push_token = $1")
            .bind(expo_push_token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a token only if it belongs to `user_id`
    pub async fn delete_for_user(
        user_id: UserId,
        expo_push_token: &str,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM push_subscriptions WHERE user_id = $1 AND expo_push_token = $2",
        )
        .bind(user_id)
        .bind(expo_push_token)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
