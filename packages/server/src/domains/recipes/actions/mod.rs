//! Recipe actions - persist the interaction, then fire the matching event.
//!
//! Persistence is idempotent on the unique keys; events are only fired when
//! something actually changed.

mod cooks;
mod favorites;
mod publish;
mod ratings;

pub use cooks::mark_recipe_cooked;
pub use favorites::{favorite_recipe, unfavorite_recipe};
pub use publish::publish_recipe;
pub use ratings::rate_recipe;

use sqlx::PgPool;

use super::Recipe;
use crate::common::{ActionError, RecipeId, UserId};
use crate::domains::events::RecipeRef;

/// Load a recipe the user is allowed to interact with
async fn load_visible_recipe(
    recipe_id: RecipeId,
    user_id: UserId,
    pool: &PgPool,
) -> Result<Recipe, ActionError> {
    Recipe::find_by_id(recipe_id, pool)
        .await?
        .filter(|recipe| recipe.is_visible_to(user_id))
        .ok_or(ActionError::NotFound("Recipe"))
}

fn recipe_ref(recipe: &Recipe) -> RecipeRef {
    RecipeRef {
        recipe_id: recipe.id,
        recipe_title: recipe.title.clone(),
        recipe_slug: Some(recipe.slug.clone()),
    }
}
