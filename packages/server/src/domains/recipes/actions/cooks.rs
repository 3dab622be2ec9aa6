use tracing::info;

use super::{load_visible_recipe, recipe_ref};
use crate::common::{ActionError, RecipeId, UserId};
use crate::domains::events::{fire_event, AppEvent, FireEvent};
use crate::domains::recipes::Cook;
use crate::kernel::ServerDeps;

pub async fn mark_recipe_cooked(
    user_id: UserId,
    recipe_id: RecipeId,
    deps: &ServerDeps,
) -> Result<Cook, ActionError> {
    let recipe = load_visible_recipe(recipe_id, user_id, &deps.db_pool).await?;
    let cook = Cook::create(user_id, recipe.id, &deps.db_pool).await?;

    info!(user_id = %user_id, recipe_id = %recipe.id, "Recipe cooked");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::RecipeCooked(recipe_ref(&recipe)))
            .actor_id(user_id)
            .recipient_id(recipe.author_id)
            .revalidate_paths(vec![recipe.path()])
            .build(),
        deps,
    )
    .await?;

    Ok(cook)
}
