use tracing::info;

use crate::common::{ActionError, UserId};
use crate::domains::events::{display_name, fire_event, AppEvent, FireEvent, FollowedUser};
use crate::domains::users::{Follow, Profile, User};
use crate::kernel::ServerDeps;

fn profile_path(user_id: UserId) -> String {
    format!("/nutzer/{}", user_id)
}

/// Snapshot of the followed user's display name for the activity metadata
async fn followed_user(user_id: UserId, deps: &ServerDeps) -> Result<FollowedUser, ActionError> {
    let user = User::find_by_id(user_id, &deps.db_pool)
        .await?
        .ok_or(ActionError::NotFound("User"))?;
    let profile = Profile::find_by_user_id(user_id, &deps.db_pool).await?;

    let followed_name = display_name(&user, profile.as_ref()).map(str::to_string);

    Ok(FollowedUser {
        followed_user_id: user.id,
        followed_name,
    })
}

/// Follow another user. Returns false if already following.
pub async fn follow_user(
    follower_id: UserId,
    following_id: UserId,
    deps: &ServerDeps,
) -> Result<bool, ActionError> {
    if follower_id == following_id {
        return Err(ActionError::InvalidInput("cannot follow yourself".to_string()));
    }

    let followed = followed_user(following_id, deps).await?;

    if Follow::create_if_absent(follower_id, following_id, &deps.db_pool)
        .await?
        .is_none()
    {
        return Ok(false);
    }

    info!(follower_id = %follower_id, following_id = %following_id, "User followed");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::UserFollowed(followed))
            .actor_id(follower_id)
            .recipient_id(following_id)
            .revalidate_paths(vec![profile_path(following_id)])
            .build(),
        deps,
    )
    .await?;

    Ok(true)
}

/// Stop following a user. Returns false if there was no follow edge.
pub async fn unfollow_user(
    follower_id: UserId,
    following_id: UserId,
    deps: &ServerDeps,
) -> Result<bool, ActionError> {
    let followed = followed_user(following_id, deps).await?;

    if !Follow::delete(follower_id, following_id, &deps.db_pool).await? {
        return Ok(false);
    }

    info!(follower_id = %follower_id, following_id = %following_id, "User unfollowed");

    fire_event(
        FireEvent::builder()
            .event(AppEvent::UserUnfollowed(followed))
            .actor_id(follower_id)
            .revalidate_paths(vec![profile_path(following_id)])
            .build(),
        deps,
    )
    .await?;

    Ok(true)
}
