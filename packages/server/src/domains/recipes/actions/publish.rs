use tracing::{info, warn};

use super::recipe_ref;
use crate::common::{ActionError, RecipeId, UserId};
use crate::domains::events::{fire_event, AppEvent, FireEvent};
use crate::domains::recipes::Recipe;
use crate::domains::users::Follow;
use crate::kernel::ServerDeps;

/// Publish a draft and tell the author's followers.
///
/// The activity row is written once; each follower then gets a
/// notification-only event. Publishing an already published recipe is a
/// no-op.
pub async fn publish_recipe(
    user_id: UserId,
    recipe_id: RecipeId,
    deps: &ServerDeps,
) -> Result<Recipe, ActionError> {
    let pool = &deps.db_pool;

    let recipe = Recipe::find_by_id(recipe_id, pool)
        .await?
        .ok_or(ActionError::NotFound("Recipe"))?;

    if recipe.author_id != user_id {
        return Err(ActionError::Forbidden(
            "only the author can publish a recipe".to_string(),
        ));
    }

    if recipe.is_published() {
        return Ok(recipe);
    }

    let recipe = Recipe::publish(recipe.id, pool).await?;
    info!(user_id = %user_id, recipe_id = %recipe.id, "Recipe published");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::RecipePublished(recipe_ref(&recipe)))
            .actor_id(user_id)
            .revalidate_paths(vec!["/".to_string(), recipe.path()])
            .build(),
        deps,
    )
    .await?;

    let followers = Follow::find_follower_ids(user_id, pool).await?;
    for follower_id in followers {
        let result = fire_event(
            FireEvent::builder()
                .event(AppEvent::RecipePublished(recipe_ref(&recipe)))
                .actor_id(user_id)
                .recipient_id(follower_id)
                .skip_activity(true)
                .skip_tracking(true)
                .build(),
            deps,
        )
        .await;

        // one failing follower must not stop the others
        if let Err(e) = result {
            warn!(follower_id = %follower_id, error = %e, "Failed to notify follower");
        }
    }

    Ok(recipe)
}
