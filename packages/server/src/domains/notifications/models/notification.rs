use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{NotificationId, UserId, ValidatedPaginationArgs};

/// Notification category shown in the bell and used for push routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    RecipeLike,
    RecipeRating,
    RecipeCooked,
    RecipeComment,
    NewFollower,
    NewRecipe,
    /// Platform messages (welcome, account activation); may target the actor
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::RecipeLike => "RECIPE_LIKE",
            NotificationType::RecipeRating => "RECIPE_RATING",
            NotificationType::RecipeCooked => "RECIPE_COOKED",
            NotificationType::RecipeComment => "RECIPE_COMMENT",
            NotificationType::NewFollower => "NEW_FOLLOWER",
            NotificationType::NewRecipe => "NEW_RECIPE",
            NotificationType::System => "SYSTEM",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RECIPE_LIKE" => Ok(NotificationType::RecipeLike),
            "RECIPE_RATING" => Ok(NotificationType::RecipeRating),
            "RECIPE_COOKED" => Ok(NotificationType::RecipeCooked),
            "RECIPE_COMMENT" => Ok(NotificationType::RecipeComment),
            "NEW_FOLLOWER" => Ok(NotificationType::NewFollower),
            "NEW_RECIPE" => Ok(NotificationType::NewRecipe),
            "SYSTEM" => Ok(NotificationType::System),
            _ => Err(anyhow::anyhow!("Invalid notification type: {}", s)),
        }
    }
}

/// Notification row - one alert for one recipient
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: Option<Value>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a notification
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<Value>,
}

impl Notification {
    pub async fn create(input: CreateNotification, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, user_id, notification_type, title, message, data)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(input.user_id)
        .bind(input.notification_type.as_str())
        .bind(&input.title)
        .bind(&input.message)
        .bind(&input.data)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest-first page; fetches `limit + 1` rows so callers can trim
    pub async fn find_for_user_paginated(
        user_id: UserId,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications
             WHERE user_id = $1
               AND ($2::uuid IS NULL OR id < $2)
             ORDER BY id DESC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(args.cursor)
        .bind(args.fetch_limit())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_unread(user_id: UserId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark one notification read; scoped to its recipient
    pub async fn mark_read(
        id: NotificationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE notifications
             SET read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_all_read(user_id: UserId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_roundtrip() {
        for kind in [
            NotificationType::RecipeLike,
            NotificationType::RecipeRating,
            NotificationType::RecipeCooked,
            NotificationType::RecipeComment,
            NotificationType::NewFollower,
            NotificationType::NewRecipe,
            NotificationType::System,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationType>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.to_string())
            );
        }
    }

    #[test]
    fn test_unknown_notification_type() {
        assert!("RECIPE_SHARE".parse::<NotificationType>().is_err());
    }
}
