use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of application events (wire names are camelCase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
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

impl EventName {
    pub const ALL: [EventName; 12] = [
        EventName::RecipeCreated,
        EventName::RecipeUpdated,
        EventName::RecipePublished,
        EventName::RecipeFavorited,
        EventName::RecipeUnfavorited,
        EventName::RecipeRated,
        EventName::RecipeCooked,
        EventName::RecipeCommented,
        EventName::UserFollowed,
        EventName::UserUnfollowed,
        EventName::UserRegistered,
        EventName::UserActivated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::RecipeCreated => "recipeCreated",
            EventName::RecipeUpdated => "recipeUpdated",
            EventName::RecipePublished => "recipePublished",
            EventName::RecipeFavorited => "recipeFavorited",
            EventName::RecipeUnfavorited => "recipeUnfavorited",
            EventName::RecipeRated => "recipeRated",
            EventName::RecipeCooked => "recipeCooked",
            EventName::RecipeCommented => "recipeCommented",
            EventName::UserFollowed => "userFollowed",
            EventName::UserUnfollowed => "userUnfollowed",
            EventName::UserRegistered => "userRegistered",
            EventName::UserActivated => "userActivated",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown event: {0}")]
pub struct UnknownEventName(pub String);

impl FromStr for EventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownEventName(s.to_string()))
    }
}
