//! Typed payloads, one per event.
//!
//! `AppEvent` is adjacently tagged so the JSON form is
//! `{"event": "recipeFavorited", "data": {"recipeId": ..., "recipeTitle": ...}}`,
//! the shape the frontend posts to the internal events route.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::names::EventName;
use crate::common::{CommentId, RecipeId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRef {
    pub recipe_id: RecipeId,
    pub recipe_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRating {
    pub recipe_id: RecipeId,
    pub recipe_title: String,
    pub rating: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeComment {
    pub recipe_id: RecipeId,
    pub recipe_title: String,
    pub comment_id: CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowedUser {
    pub followed_user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An application event together with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum AppEvent {
    RecipeCreated(RecipeRef),
    RecipeUpdated(RecipeRef),
    RecipePublished(RecipeRef),
    RecipeFavorited(RecipeRef),
    RecipeUnfavorited(RecipeRef),
    RecipeRated(RecipeRating),
    RecipeCooked(RecipeRef),
    RecipeCommented(RecipeComment),
    UserFollowed(FollowedUser),
    UserUnfollowed(FollowedUser),
    UserRegistered(Registration),
    UserActivated(Activation),
}

impl AppEvent {
    pub fn name(&self) -> EventName {
        match self {
            AppEvent::RecipeCreated(_) => EventName::RecipeCreated,
            AppEvent::RecipeUpdated(_) => EventName::RecipeUpdated,
            AppEvent::RecipePublished(_) => EventName::RecipePublished,
            AppEvent::RecipeFavorited(_) => EventName::RecipeFavorited,
            AppEvent::RecipeUnfavorited(_) => EventName::RecipeUnfavorited,
            AppEvent::RecipeRated(_) => EventName::RecipeRated,
            AppEvent::RecipeCooked(_) => EventName::RecipeCooked,
            AppEvent::RecipeCommented(_) => EventName::RecipeCommented,
            AppEvent::UserFollowed(_) => EventName::UserFollowed,
            AppEvent::UserUnfollowed(_) => EventName::UserUnfollowed,
            AppEvent::UserRegistered(_) => EventName::UserRegistered,
            AppEvent::UserActivated(_) => EventName::UserActivated,
        }
    }

    /// The payload alone, as JSON
    pub fn data(&self) -> Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut tagged| tagged.get_mut("data").map(Value::take))
            .unwrap_or(Value::Null)
    }

    /// Rebuild a typed event from a wire name and an untyped payload
    pub fn from_parts(name: EventName, data: Value) -> serde_json::Result<Self> {
        let data = if data.is_null() { json!({}) } else { data };
        serde_json::from_value(json!({ "event": name.as_str(), "data": data }))
    }
}
