use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::common::{RecipeId, UserId};

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeStatus {
    Draft,
    Published,
    Archived,
}

impl RecipeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeStatus::Draft => "DRAFT",
            RecipeStatus::Published => "PUBLISHED",
            RecipeStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DRAFT" => Ok(RecipeStatus::Draft),
            "PUBLISHED" => Ok(RecipeStatus::Published),
            "ARCHIVED" => Ok(RecipeStatus::Archived),
            _ => Err(anyhow::anyhow!("Invalid recipe status: {}", s)),
        }
    }
}

/// Recipe - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub category_id: Option<Uuid>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRecipe {
    pub author_id: UserId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: RecipeStatus,
    pub category_id: Option<Uuid>,
}

impl Recipe {
    pub async fn find_by_id(id: RecipeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: CreateRecipe, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recipes (id, author_id, title, slug, description, status, category_id, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, CASE WHEN $6 = 'PUBLISHED' THEN NOW() END)
             RETURNING *",
        )
        .bind(RecipeId::new())
        .bind(input.author_id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.status.as_str())
        .bind(input.category_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Set status to PUBLISHED; keeps the first publication date
    pub async fn publish(id: RecipeId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE recipes
             SET status = 'PUBLISHED',
                 published_at = COALESCE(published_at, NOW()),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_status(id: RecipeId, status: RecipeStatus, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE recipes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub fn status(&self) -> Option<RecipeStatus> {
        self.status.parse().ok()
    }

    pub fn is_published(&self) -> bool {
        self.status() == Some(RecipeStatus::Published)
    }

    /// Published recipes are visible to everyone, drafts only to their author
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.is_published() || self.author_id == user_id
    }

    /// Frontend path of the recipe page
    pub fn path(&self) -> String {
        format!("/rezepte/{}", self.slug)
    }
}
