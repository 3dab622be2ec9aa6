//! Integration tests for the notification and activity GraphQL API.

mod common;

use common::{fixtures, TestHarness};
use server_core::common::UserId;
use server_core::domains::recipes::Recipe;
use server_core::domains::recipes::actions::favorite_recipe;
use test_context::test_context;

/// `count` fans favorite one recipe of a fresh author
async fn author_with_notifications(ctx: &TestHarness, count: usize) -> (UserId, Recipe) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Schwarzwälder Kirschtorte")
        .await
        .unwrap();
    let deps = ctx.server_deps();

    for i in 0..count {
        let fan = fixtures::create_user(&ctx.db_pool, &format!("Fan{}", i)).await.unwrap();
        favorite_recipe(fan, recipe.id, &deps).await.unwrap();
    }
    (author, recipe)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn notifications_require_authentication(ctx: &TestHarness) {
    let result = ctx.graphql().execute("{ unreadNotificationCount }").await;

    assert!(!result.is_ok());
    assert_eq!(result.first_code(), Some("UNAUTHENTICATED"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn notifications_are_paginated_newest_first(ctx: &TestHarness) {
    let (author, _) = author_with_notifications(ctx, 3).await;
    let client = ctx.graphql_as(author);

    let page = client
        .query(
            r#"{ notifications(first: 2) {
                nodes { id message read }
                pageInfo { hasNextPage endCursor }
            } }"#,
        )
        .await;

    let nodes = page["notifications"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0]["message"].as_str().unwrap().contains("Fan2"));
    assert!(nodes[1]["message"].as_str().unwrap().contains("Fan1"));
    assert_eq!(page["notifications"]["pageInfo"]["hasNextPage"], true);

    let cursor = page["notifications"]["pageInfo"]["endCursor"]
        .as_str()
        .unwrap()
        .to_string();
    let rest = client
        .query_with_vars(
            r#"query($after: String) { notifications(first: 2, after: $after) {
                nodes { message }
                pageInfo { hasNextPage }
            } }"#,
            vars!("after" => cursor),
        )
        .await;

    let nodes = rest["notifications"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0]["message"].as_str().unwrap().contains("Fan0"));
    assert_eq!(rest["notifications"]["pageInfo"]["hasNextPage"], false);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_cursor_is_rejected(ctx: &TestHarness) {
    let user = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();

    let result = ctx
        .graphql_as(user)
        .execute(r#"{ notifications(after: "kein-cursor") { nodes { id } } }"#)
        .await;

    assert_eq!(result.first_code(), Some("BAD_USER_INPUT"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn marking_notifications_read(ctx: &TestHarness) {
    let (author, _) = author_with_notifications(ctx, 2).await;
    let client = ctx.graphql_as(author);

    let data = client.query("{ unreadNotificationCount }").await;
    assert_eq!(data["unreadNotificationCount"], 2);

    let page = client.query("{ notifications { nodes { id } } }").await;
    let id = page["notifications"]["nodes"][0]["id"].as_str().unwrap().to_string();

    let marked = client
        .query_with_vars(
            r#"mutation($id: Uuid!) { markNotificationRead(notificationId: $id) { id read } }"#,
            vars!("id" => id),
        )
        .await;
    assert_eq!(marked["markNotificationRead"]["read"], true);

    let data = client.query("{ unreadNotificationCount }").await;
    assert_eq!(data["unreadNotificationCount"], 1);

    let data = client.query("mutation { markAllNotificationsRead }").await;
    assert_eq!(data["markAllNotificationsRead"], 1);

    let data = client.query("{ unreadNotificationCount }").await;
    assert_eq!(data["unreadNotificationCount"], 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cannot_mark_someone_elses_notification(ctx: &TestHarness) {
    let (author, _) = author_with_notifications(ctx, 1).await;
    let stranger = fixtures::create_user(&ctx.db_pool, "Fremd").await.unwrap();

    let page = ctx
        .graphql_as(author)
        .query("{ notifications { nodes { id } } }")
        .await;
    let id = page["notifications"]["nodes"][0]["id"].as_str().unwrap().to_string();

    let result = ctx
        .graphql_as(stranger)
        .execute_with_vars(
            r#"mutation($id: Uuid!) { markNotificationRead(notificationId: $id) { id } }"#,
            vars!("id" => id),
        )
        .await;

    assert_eq!(result.first_code(), Some("NOT_FOUND"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn preferences_default_and_update(ctx: &TestHarness) {
    let user = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let client = ctx.graphql_as(user);

    let data = client
        .query("{ notificationPreferences { notifyOnRecipeLike notifyOnAnonymous } }")
        .await;
    assert_eq!(data["notificationPreferences"]["notifyOnRecipeLike"], true);
    assert_eq!(data["notificationPreferences"]["notifyOnAnonymous"], false);

    let data = client
        .query(
            r#"mutation { updateNotificationPreferences(input: { notifyOnRecipeLike: false }) {
                notifyOnRecipeLike notifyOnRecipeRating
            } }"#,
        )
        .await;
    assert_eq!(data["updateNotificationPreferences"]["notifyOnRecipeLike"], false);
    assert_eq!(data["updateNotificationPreferences"]["notifyOnRecipeRating"], true);

    let empty = client
        .execute("mutation { updateNotificationPreferences(input: {}) { notifyOnRecipeLike } }")
        .await;
    assert_eq!(empty.first_code(), Some("BAD_USER_INPUT"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn favorite_mutation_fires_the_event(ctx: &TestHarness) {
    let author = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let fan = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Dampfnudeln")
        .await
        .unwrap();

    let data = ctx
        .graphql_as(fan)
        .query_with_vars(
            r#"mutation($id: Uuid!) { favoriteRecipe(recipeId: $id) }"#,
            vars!("id" => recipe.id.to_string()),
        )
        .await;
    assert_eq!(data["favoriteRecipe"], true);

    let data = ctx.graphql_as(author).query("{ unreadNotificationCount }").await;
    assert_eq!(data["unreadNotificationCount"], 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn activity_feed_includes_followed_users(ctx: &TestHarness) {
    let reader = fixtures::create_user(&ctx.db_pool, "Anni").await.unwrap();
    let followed = fixtures::create_user(&ctx.db_pool, "Bea").await.unwrap();
    let hidden = fixtures::create_user(&ctx.db_pool, "Carla").await.unwrap();
    fixtures::follow(&ctx.db_pool, reader, followed).await.unwrap();
    fixtures::follow(&ctx.db_pool, reader, hidden).await.unwrap();
    fixtures::hide_in_activity(&ctx.db_pool, hidden).await.unwrap();

    let author = fixtures::create_user(&ctx.db_pool, "Dora").await.unwrap();
    let recipe = fixtures::create_published_recipe(&ctx.db_pool, author, "Rinderrouladen")
        .await
        .unwrap();
    let deps = ctx.server_deps();
    favorite_recipe(followed, recipe.id, &deps).await.unwrap();
    favorite_recipe(hidden, recipe.id, &deps).await.unwrap();

    let data = ctx
        .graphql_as(reader)
        .query("{ activityFeed(limit: 10) { userId activityType targetId } }")
        .await;

    let feed = data["activityFeed"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["userId"], followed.to_string());
    assert_eq!(feed[0]["activityType"], "RECIPE_FAVORITED");
    assert_eq!(feed[0]["targetId"], recipe.id.to_string());
}
