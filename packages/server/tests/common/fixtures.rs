//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly; raw SQL only where no model
//! method exists (tags, ingredients, forced timestamps).

use anyhow::Result;
use chrono::{DateTime, Utc};
use server_core::common::{RecipeId, UserId};
use server_core::domains::notifications::{NotificationPreferenceKey, NotificationPreferences};
use server_core::domains::recipes::models::recipe::CreateRecipe;
use server_core::domains::recipes::{Recipe, RecipeStatus};
use server_core::domains::users::{Follow, Profile, PushSubscription, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a user (with empty profile) under a unique email
pub async fn create_user(pool: &PgPool, name: &str) -> Result<UserId> {
    let email = format!("{}-{}@test.local", name.to_lowercase(), Uuid::new_v4());
    let user = User::create(&email, Some(name), pool).await?;
    Ok(user.id)
}

pub async fn set_nickname(pool: &PgPool, user_id: UserId, nickname: &str) -> Result<()> {
    Profile::update_display(user_id, Some(nickname), true, pool).await?;
    Ok(())
}

/// Hide the user in other users' feeds ("Jemand")
pub async fn hide_in_activity(pool: &PgPool, user_id: UserId) -> Result<()> {
    Profile::update_display(user_id, None, false, pool).await?;
    Ok(())
}

pub async fn set_preference(
    pool: &PgPool,
    user_id: UserId,
    key: NotificationPreferenceKey,
    enabled: bool,
) -> Result<()> {
    let mut changes = NotificationPreferences::new();
    changes.set(key, enabled);
    Profile::update_notification_preferences(user_id, &changes, pool).await?;
    Ok(())
}

pub async fn set_notify_on_anonymous(pool: &PgPool, user_id: UserId, enabled: bool) -> Result<()> {
    let mut changes = NotificationPreferences::new();
    changes.set_notify_on_anonymous(enabled);
    Profile::update_notification_preferences(user_id, &changes, pool).await?;
    Ok(())
}

pub async fn create_recipe(
    pool: &PgPool,
    author_id: UserId,
    title: &str,
    status: RecipeStatus,
) -> Result<Recipe> {
    let recipe = Recipe::create(
        CreateRecipe {
            author_id,
            title: title.to_string(),
            slug: format!("{}-{}", title.to_lowercase().replace(' ', "-"), Uuid::new_v4()),
            description: Some(format!("{} nach Omas Art", title)),
            status,
            category_id: None,
        },
        pool,
    )
    .await?;

    if status == RecipeStatus::Published {
        return Ok(Recipe::publish(recipe.id, pool).await?);
    }
    Ok(recipe)
}

pub async fn create_published_recipe(pool: &PgPool, author_id: UserId, title: &str) -> Result<Recipe> {
    create_recipe(pool, author_id, title, RecipeStatus::Published).await
}

pub async fn follow(pool: &PgPool, follower_id: UserId, following_id: UserId) -> Result<()> {
    Follow::create_if_absent(follower_id, following_id, pool).await?;
    Ok(())
}

pub async fn register_device(pool: &PgPool, user_id: UserId) -> Result<String> {
    let token = format!("ExponentPushToken[{}]", Uuid::new_v4().simple());
    PushSubscription::upsert(user_id, &token, pool).await?;
    Ok(token)
}

/// Attach a tag by name, creating it if needed
pub async fn add_tag(pool: &PgPool, recipe_id: RecipeId, name: &str) -> Result<()> {
    let tag_id: Uuid = sqlx::query_scalar(
        "INSERT INTO tags (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(recipe_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn add_ingredient(pool: &PgPool, recipe_id: RecipeId, name: &str) -> Result<()> {
    let ingredient_id: Uuid = sqlx::query_scalar(
        "INSERT INTO ingredients (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Force `updated_at` so sync tests control the cursor order
pub async fn set_updated_at(pool: &PgPool, recipe_id: RecipeId, at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE recipes SET updated_at = $2 WHERE id = $1")
        .bind(recipe_id)
        .bind(at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_activities(pool: &PgPool, user_id: UserId) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?)
}

pub async fn count_notifications(pool: &PgPool, user_id: UserId) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?)
}
