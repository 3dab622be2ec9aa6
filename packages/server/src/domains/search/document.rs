//! Search document for one published recipe

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::RecipeSearchRow;
use crate::kernel::BulkOperation;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_name: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    /// Lowercased concatenation of every searchable text
    pub keywords: String,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeDocument {
    pub fn from_row(row: &RecipeSearchRow) -> Self {
        let keywords = std::iter::once(row.title.as_str())
            .chain(row.description.as_deref())
            .chain(row.category.as_deref())
            .chain(row.tags.iter().map(String::as_str))
            .chain(row.ingredients.iter().map(String::as_str))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: row.id.to_string(),
            title: row.title.clone(),
            slug: row.slug.clone(),
            description: row.description.clone(),
            image_url: row.image_url.clone(),
            author_id: row.author_id.to_string(),
            author_name: row.author_name.clone(),
            category: row.category.clone(),
            tags: row.tags.clone(),
            ingredients: row.ingredients.clone(),
            keywords,
            published_at: row.published_at,
            updated_at: row.updated_at,
        }
    }

    /// Index write for a changed row: upsert if published, delete otherwise
    pub fn operation_for(row: &RecipeSearchRow) -> BulkOperation {
        let id = row.id.to_string();
        if !row.is_published() {
            return BulkOperation::Delete { id };
        }

        match serde_json::to_value(Self::from_row(row)) {
            Ok(document) => BulkOperation::Index { id, document },
            // a document that cannot be serialized must not stay searchable
            Err(_) => BulkOperation::Delete { id },
        }
    }

    /// Settings and mappings used when creating the index
    pub fn index_definition() -> Value {
        json!({
            "settings": {
                "analysis": {
                    "analyzer": {
                        "recipe_text": {
                            "type": "custom",
                            "tokenizer": "standard",
                            "filter": ["lowercase", "german_normalization"]
                        }
                    }
                }
            },
            "mappings": {
                "properties": {
                    "id": { "type": "keyword" },
                    "title": {
                        "type": "text",
                        "analyzer": "recipe_text",
                        "fields": { "raw": { "type": "keyword" } }
                    },
                    "slug": { "type": "keyword" },
                    "description": { "type": "text", "analyzer": "recipe_text" },
                    "imageUrl": { "type": "keyword", "index": false },
                    "authorId": { "type": "keyword" },
                    "authorName": { "type": "text" },
                    "category": { "type": "keyword" },
                    "tags": { "type": "keyword" },
                    "ingredients": { "type": "keyword" },
                    "keywords": { "type": "text", "analyzer": "recipe_text" },
                    "publishedAt": { "type": "date" },
                    "updatedAt": { "type": "date" }
                }
            }
        })
    }
}
