//! GraphQL types for recipe interactions

use chrono::{DateTime, Utc};
use juniper::GraphQLObject;
use uuid::Uuid;

use super::{Cook, Rating, Recipe};

#[derive(Debug, Clone, GraphQLObject)]
pub struct RecipeData {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Recipe> for RecipeData {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id.into_uuid(),
            author_id: r.author_id.into_uuid(),
            title: r.title,
            slug: r.slug,
            status: r.status,
            published_at: r.published_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct RatingData {
    pub recipe_id: Uuid,
    pub rating: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<Rating> for RatingData {
    fn from(r: Rating) -> Self {
        Self {
            recipe_id: r.recipe_id.into_uuid(),
            rating: i32::from(r.rating),
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct CookData {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Cook> for CookData {
    fn from(c: Cook) -> Self {
        Self {
            id: c.id,
            recipe_id: c.recipe_id.into_uuid(),
            created_at: c.created_at,
        }
    }
}
