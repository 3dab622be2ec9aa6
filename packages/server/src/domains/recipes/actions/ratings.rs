use tracing::info;

use super::load_visible_recipe;
use crate::common::{ActionError, RecipeId, UserId};
use crate::domains::events::{fire_event, AppEvent, FireEvent, RecipeRating};
use crate::domains::recipes::models::rating::{MAX_RATING, MIN_RATING};
use crate::domains::recipes::Rating;
use crate::kernel::ServerDeps;

/// Rate a recipe 1..=5 stars; rating again replaces the previous value
pub async fn rate_recipe(
    user_id: UserId,
    recipe_id: RecipeId,
    rating: i32,
    deps: &ServerDeps,
) -> Result<Rating, ActionError> {
    let rating = i16::try_from(rating)
        .ok()
        .filter(|r| Rating::is_valid(*r))
        .ok_or_else(|| {
            ActionError::InvalidInput(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            ))
        })?;

    let recipe = load_visible_recipe(recipe_id, user_id, &deps.db_pool).await?;
    let saved = Rating::upsert(user_id, recipe.id, rating, &deps.db_pool).await?;

    info!(user_id = %user_id, recipe_id = %recipe.id, rating, "Recipe rated");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::RecipeRated(RecipeRating {
                recipe_id: recipe.id,
                recipe_title: recipe.title.clone(),
                rating,
            }))
            .actor_id(user_id)
            .recipient_id(recipe.author_id)
            .revalidate_paths(vec![recipe.path()])
            .build(),
        deps,
    )
    .await?;

    Ok(saved)
}
