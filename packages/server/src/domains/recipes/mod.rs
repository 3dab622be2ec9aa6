//! Recipes domain - the social interactions around a recipe (favorites,
//! ratings, "cooked it" marks) and publishing.
//!
//! Recipe authoring itself lives in the frontend; this service reads recipes
//! to address notifications and flips the publish status.

pub mod actions;
pub mod data;
pub mod models;

pub use models::{Cook, Favorite, Rating, Recipe, RecipeStatus};
