use tracing::info;

use super::{load_visible_recipe, recipe_ref};
use crate::common::{ActionError, RecipeId, UserId};
use crate::domains::events::{fire_event, AppEvent, FireEvent};
use crate::domains::recipes::Favorite;
use crate::kernel::ServerDeps;

/// Mark a recipe as favorite. Returns false if it already was one.
pub async fn favorite_recipe(
    user_id: UserId,
    recipe_id: RecipeId,
    deps: &ServerDeps,
) -> Result<bool, ActionError> {
    let recipe = load_visible_recipe(recipe_id, user_id, &deps.db_pool).await?;

    if Favorite::create_if_absent(user_id, recipe.id, &deps.db_pool)
        .await?
        .is_none()
    {
        return Ok(false);
    }

    info!(user_id = %user_id, recipe_id = %recipe.id, "Recipe favorited");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::RecipeFavorited(recipe_ref(&recipe)))
            .actor_id(user_id)
            .recipient_id(recipe.author_id)
            .revalidate_paths(vec![recipe.path()])
            .build(),
        deps,
    )
    .await?;

    Ok(true)
}

/// Remove a favorite mark. Returns false if there was none.
pub async fn unfavorite_recipe(
    user_id: UserId,
    recipe_id: RecipeId,
    deps: &ServerDeps,
) -> Result<bool, ActionError> {
    let recipe = load_visible_recipe(recipe_id, user_id, &deps.db_pool).await?;

    if !Favorite::delete(user_id, recipe.id, &deps.db_pool).await? {
        return Ok(false);
    }

    info!(user_id = %user_id, recipe_id = %recipe.id, "Recipe unfavorited");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::RecipeUnfavorited(recipe_ref(&recipe)))
            .actor_id(user_id)
            .revalidate_paths(vec![recipe.path()])
            .build(),
        deps,
    )
    .await?;

    Ok(true)
}
