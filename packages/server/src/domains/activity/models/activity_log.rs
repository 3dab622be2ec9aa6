use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::common::{ActivityLogId, UserId};

/// Kind of action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    RecipeCreated,
    RecipeUpdated,
    RecipePublished,
    RecipeFavorited,
    RecipeUnfavorited,
    RecipeRated,
    RecipeCooked,
    RecipeCommented,
    UserFollowed,
    UserUnfollowed,
    UserRegistered,
    UserActivated,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::RecipeCreated => "RECIPE_CREATED",
            ActivityType::RecipeUpdated => "RECIPE_UPDATED",
            ActivityType::RecipePublished => "RECIPE_PUBLISHED",
            ActivityType::RecipeFavorited => "RECIPE_FAVORITED",
            ActivityType::RecipeUnfavorited => "RECIPE_UNFAVORITED",
            ActivityType::RecipeRated => "RECIPE_RATED",
            ActivityType::RecipeCooked => "RECIPE_COOKED",
            ActivityType::RecipeCommented => "RECIPE_COMMENTED",
            ActivityType::UserFollowed => "USER_FOLLOWED",
            ActivityType::UserUnfollowed => "USER_UNFOLLOWED",
            ActivityType::UserRegistered => "USER_REGISTERED",
            ActivityType::UserActivated => "USER_ACTIVATED",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RECIPE_CREATED" => Ok(ActivityType::RecipeCreated),
            "RECIPE_UPDATED" => Ok(ActivityType::RecipeUpdated),
            "RECIPE_PUBLISHED" => Ok(ActivityType::RecipePublished),
            "RECIPE_FAVORITED" => Ok(ActivityType::RecipeFavorited),
            "RECIPE_UNFAVORITED" => Ok(ActivityType::RecipeUnfavorited),
            "RECIPE_RATED" => Ok(ActivityType::RecipeRated),
            "RECIPE_COOKED" => Ok(ActivityType::RecipeCooked),
            "RECIPE_COMMENTED" => Ok(ActivityType::RecipeCommented),
            "USER_FOLLOWED" => Ok(ActivityType::UserFollowed),
            "USER_UNFOLLOWED" => Ok(ActivityType::UserUnfollowed),
            "USER_REGISTERED" => Ok(ActivityType::UserRegistered),
            "USER_ACTIVATED" => Ok(ActivityType::UserActivated),
            _ => Err(anyhow::anyhow!("Invalid activity type: {}", s)),
        }
    }
}

/// Entity an activity points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Recipe,
    User,
    Comment,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Recipe => "RECIPE",
            TargetType::User => "USER",
            TargetType::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity log row
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: ActivityLogId,
    /// Actor
    pub user_id: UserId,
    pub activity_type: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub metadata: Option<Value>,
}

impl ActivityLog {
    pub async fn create(input: CreateActivityLog, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO activity_logs (id, user_id, activity_type, target_type, target_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ActivityLogId::new())
        .bind(input.user_id)
        .bind(input.activity_type.as_str())
        .bind(input.target_type.as_str())
        .bind(input.target_id)
        .bind(&input.metadata)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_user(user_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM activity_logs WHERE user_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Feed for a user: their own activity plus that of followed users who
    /// show up in activity feeds. Newest first.
    pub async fn find_feed_for_user(
        user_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT a.*
             FROM activity_logs a
             WHERE a.user_id = $1
                OR a.user_id IN (
                    SELECT f.following_id
                    FROM follows f
                    JOIN profiles p ON p.user_id = f.following_id
                    WHERE f.follower_id = $1 AND p.show_in_activity = true
                )
             ORDER BY a.id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub fn kind(&self) -> Option<ActivityType> {
        self.activity_type.parse().ok()
    }
}
