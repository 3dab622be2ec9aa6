//! Integration tests for the social actions (favorites, ratings, cooks,
//! follows, publishing) and the events they fire.

mod common;

use common::{fixtures, TestHarness};
use server_core::common::ActionError;
use server_core::domains::recipes::actions::{
    favorite_recipe, mark_recipe_cooked, publish_recipe, rate_recipe, unfavorite_recipe,
};
use server_core::domains::recipes::{Favorite, RecipeStatus};
use server_core::domains::users::actions::{follow_user, unfollow_user};
use test_context::test_context;

// ============================================================================
// Favorites
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn favoriting_twice_fires_once(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let fan = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Zwetschgenkuchen")
        .await
        .unwrap();
    let deps = ctx.server_deps();

    assert!(favorite_recipe(fan, recipe.id, &deps).await.unwrap());
    assert!(!favorite_recipe(fan, recipe.id, &deps).await.unwrap());

    assert_eq!(Favorite::count_for_recipe(recipe.id, &ctx.db_pool).await.unwrap(), 1);
    assert_eq!(fixtures::count_notifications(&ctx.db_pool, author).await.unwrap(), 1);
    assert_eq!(fixtures::count_activities(&ctx.db_pool, fan).await.unwrap(), 1);
    assert_eq!(ctx.deps.cache.paths(), vec![recipe.path()]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unfavorite_without_favorite_is_a_noop(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let fan = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Rote Grütze")
        .await
        .unwrap();
    let deps = ctx.server_deps();

    assert!(!unfavorite_recipe(fan, recipe.id, &deps).await.unwrap());
    assert_eq!(fixtures::count_activities(&ctx.db_pool, fan).await.unwrap(), 0);

    favorite_recipe(fan, recipe.id, &deps).await.unwrap();
    assert!(unfavorite_recipe(fan, recipe.id, &deps).await.unwrap());
    assert_eq!(fixtures::count_activities(&ctx.db_pool, fan).await.unwrap(), 2);
    // only the favorite notified the author
    assert_eq!(fixtures::count_notifications(&ctx.db_pool, author).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn drafts_are_invisible_to_other_users(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let fan = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let draft = fixtures::create_recipe(&ctx.db_pool, author, "Geheimrezept", RecipeStatus::Draft)
        .await
        .unwrap();

    let err = favorite_recipe(fan, draft.id, &ctx.server_deps())
        .await
        .expect_err("draft must not be found");
    assert!(matches!(err, ActionError::NotFound("Recipe")));
}

// ============================================================================
// Ratings and cooks
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn rating_is_validated_and_replaced(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let fan = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Gulasch")
        .await
        .unwrap();
    let deps = ctx.server_deps();

    for invalid in [0, 6, -1, 70_000] {
        let err = rate_recipe(fan, recipe.id, invalid, &deps).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidInput(_)), "rating {}", invalid);
    }
    assert_eq!(fixtures::count_activities(&ctx.db_pool, fan).await.unwrap(), 0);

    rate_recipe(fan, recipe.id, 3, &deps).await.unwrap();
    let saved = rate_recipe(fan, recipe.id, 5, &deps).await.unwrap();
    assert_eq!(saved.rating, 5);

    let rated_events: Vec<_> = ctx
        .deps
        .analytics
        .events()
        .into_iter()
        .filter(|e| e.event == "recipe_rated")
        .collect();
    assert_eq!(rated_events.len(), 2);
    assert_eq!(rated_events[1].properties["rating"], serde_json::json!(5));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cooking_notifies_the_author(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let cook = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Spätzle")
        .await
        .unwrap();

    mark_recipe_cooked(cook, recipe.id, &ctx.server_deps())
        .await
        .unwrap();

    let notifications = server_core::domains::notifications::Notification::find_for_user(author, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, "RECIPE_COOKED");
    assert!(notifications[0].message.contains("Spätzle"));
}

// ============================================================================
// Follows
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn following_yourself_is_rejected(ctx: &TestHarness) {
    let user = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();

    let err = follow_user(user, user, &ctx.server_deps()).await.unwrap_err();

    assert!(matches!(err, ActionError::InvalidInput(_)));
    assert_eq!(fixtures::count_activities(&ctx.db_pool, user).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn follow_and_unfollow(ctx: &TestHarness) {
    let anni = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let bea = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    fixtures::set_nickname(&ctx.db_pool, anni, "Kochanni").await.unwrap();
    let deps = ctx.server_deps();

    assert!(follow_user(bea, anni, &deps).await.unwrap());
    assert!(!follow_user(bea, anni, &deps).await.unwrap());
    assert!(unfollow_user(bea, anni, &deps).await.unwrap());

    let notifications = server_core::domains::notifications::Notification::find_for_user(anni, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, "NEW_FOLLOWER");

    let activities = server_core::domains::activity::ActivityLog::find_by_user(bea, 10, &ctx.db_pool)
        .await
        .unwrap();
    let types: Vec<_> = activities.iter().map(|a| a.activity_type.as_str()).collect();
    assert!(types.contains(&"USER_FOLLOWED"));
    assert!(types.contains(&"USER_UNFOLLOWED"));
    assert!(activities
        .iter()
        .all(|a| a.metadata.as_ref().unwrap()["followedName"] == "Kochanni"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_nickname_falls_back_to_the_account_name(ctx: &TestHarness) {
    let anni = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let bea = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    fixtures::set_nickname(&ctx.db_pool, anni, "   ").await.unwrap();

    follow_user(bea, anni, &ctx.server_deps()).await.unwrap();

    let activities = server_core::domains::activity::ActivityLog::find_by_user(bea, 10, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].metadata.as_ref().unwrap()["followedName"], "Anni");
}

// ============================================================================
// Publishing
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn publishing_notifies_every_follower_once(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let first = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let second = fixtures::create_user(&ctx.db_pool, "Carla").await.unwrap();
    fixtures::follow(&ctx.db_pool, first, author).await.unwrap();
    fixtures::follow(&ctx.db_pool, second, author).await.unwrap();
    fixtures::set_preference(
        &ctx.db_pool,
        second,
        server_core::domains::notifications::NotificationPreferenceKey::NotifyOnNewRecipe,
        false,
    )
    .await
    .unwrap();

    let draft = fixtures::create_recipe(&ctx.db_pool, author, "Maultaschen", RecipeStatus::Draft)
        .await
        .unwrap();
    let deps = ctx.server_deps();

    let published = publish_recipe(author, draft.id, &deps).await.unwrap();
    assert!(published.is_published());
    assert!(published.published_at.is_some());

    // publishing again changes nothing
    publish_recipe(author, draft.id, &deps).await.unwrap();

    assert_eq!(fixtures::count_activities(&ctx.db_pool, author).await.unwrap(), 1);
    assert_eq!(fixtures::count_notifications(&ctx.db_pool, first).await.unwrap(), 1);
    assert_eq!(fixtures::count_notifications(&ctx.db_pool, second).await.unwrap(), 0);
    assert_eq!(fixtures::count_notifications(&ctx.db_pool, author).await.unwrap(), 0);

    let published_tracking = ctx
        .deps
        .analytics
        .events()
        .into_iter()
        .filter(|e| e.event == "recipe_published")
        .count();
    assert_eq!(published_tracking, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_the_author_can_publish(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let other = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let draft = fixtures::create_recipe(&ctx.db_pool, author, "Flammkuchen", RecipeStatus::Draft)
        .await
        .unwrap();

    let err = publish_recipe(other, draft.id, &ctx.server_deps())
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Forbidden(_)));
    assert!(ctx.deps.analytics.events().is_empty());
}
