use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{ProfileId, UserId};
use crate::domains::notifications::NotificationPreferences;

/// Public profile - display name and social/notification settings
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub nickname: Option<String>,
    /// When false the user's actions show up as "Jemand" in other users' feeds
    pub show_in_activity: bool,
    pub notification_preferences: Json<NotificationPreferences>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub async fn find_by_user_id(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn update_display(
        user_id: UserId,
        nickname: Option<&str>,
        show_in_activity: bool,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE profiles
             SET nickname = $2, show_in_activity = $3, updated_at = NOW()
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(nickname)
        .bind(show_in_activity)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Merge explicit flags into the stored preference map.
    ///
    /// Keys not present in `changes` keep their stored value (or stay absent
    /// and keep resolving to their default).
    pub async fn update_notification_preferences(
        user_id: UserId,
        changes: &NotificationPreferences,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE profiles
             SET notification_preferences = notification_preferences || $2,
                 updated_at = NOW()
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(Json(changes))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
