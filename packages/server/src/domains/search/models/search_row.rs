use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::SyncCursor;
use crate::common::{RecipeId, UserId};
use crate::domains::recipes::RecipeStatus;

/// A recipe joined with everything its search document needs
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeSearchRow {
    pub id: RecipeId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub author_id: UserId,
    pub author_name: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeSearchRow {
    /// Next page of recipes after the cursor, ordered by `(updated_at, id)`
    pub async fn find_changed_since(
        cursor: &SyncCursor,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT r.id, r.title, r.slug, r.description, r.image_url, r.status,
                    r.author_id,
                    COALESCE(NULLIF(p.nickname, ''), u.name) AS author_name,
                    c.name AS category,
                    ARRAY(
                        SELECT t.name FROM recipe_tags rt
                        JOIN tags t ON t.id = rt.tag_id
                        WHERE rt.recipe_id = r.id
                        ORDER BY t.name
                    ) AS tags,
                    ARRAY(
                        SELECT i.name FROM recipe_ingredients ri
                        JOIN ingredients i ON i.id = ri.ingredient_id
                        WHERE ri.recipe_id = r.id
                        ORDER BY i.name
                    ) AS ingredients,
                    r.published_at, r.updated_at
             FROM recipes r
             JOIN users u ON u.id = r.author_id
             LEFT JOIN profiles p ON p.user_id = r.author_id
             LEFT JOIN categories c ON c.id = r.category_id
             WHERE r.updated_at > $1 OR (r.updated_at = $1 AND r.id > $2)
             ORDER BY r.updated_at, r.id
             LIMIT $3",
        )
        .bind(cursor.last_updated_at)
        .bind(cursor.last_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub fn is_published(&self) -> bool {
        self.status.parse::<RecipeStatus>().ok() == Some(RecipeStatus::Published)
    }
}
