//! GraphQL schema definition.

use super::context::GraphQLContext;
use juniper::{graphql_value, EmptySubscription, FieldError, FieldResult, RootNode};
use tracing::error;
use uuid::Uuid;

use crate::common::{ActionError, NotificationId, PaginationArgs, RecipeId, UserId};

// Domain actions
use crate::domains::activity::actions as activity_actions;
use crate::domains::notifications::actions as notification_actions;
use crate::domains::recipes::actions as recipe_actions;
use crate::domains::users::actions as user_actions;

// Domain data types (GraphQL types)
use crate::domains::activity::data::ActivityData;
use crate::domains::notifications::data::{
    NotificationConnection, NotificationData, NotificationPreferencesData,
    NotificationPreferencesInput,
};
use crate::domains::notifications::Notification;
use crate::domains::recipes::data::{CookData, RatingData, RecipeData};

// =============================================================================
// Helper functions
// =============================================================================

/// Map action errors to client-facing field errors with a stable code
fn to_field_error(e: ActionError) -> FieldError {
    match e {
        ActionError::NotFound(what) => FieldError::new(
            format!("{} not found", what),
            graphql_value!({ "code": "NOT_FOUND" }),
        ),
        ActionError::Forbidden(msg) => {
            FieldError::new(msg, graphql_value!({ "code": "FORBIDDEN" }))
        }
        ActionError::InvalidInput(msg) => {
            FieldError::new(msg, graphql_value!({ "code": "BAD_USER_INPUT" }))
        }
        ActionError::Event(e) => {
            error!(error = %e, code = e.code(), "Event dispatch failed");
            let code = e.code();
            FieldError::new("Action failed", graphql_value!({ "code": code }))
        }
        ActionError::Internal(e) => {
            error!(error = %e, "Internal error");
            FieldError::new("Internal error", graphql_value!({ "code": "INTERNAL" }))
        }
    }
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Notification Queries
    // =========================================================================

    /// Notifications of the signed-in user, newest first (Relay cursor pagination)
    async fn notifications(
        ctx: &GraphQLContext,
        first: Option<i32>,
        after: Option<String>,
    ) -> FieldResult<NotificationConnection> {
        let user = ctx.require_user()?;
        let validated = PaginationArgs { first, after }
            .validate()
            .map_err(|e| FieldError::new(e, graphql_value!({ "code": "BAD_USER_INPUT" })))?;

        notification_actions::list_notifications(user.user_id, &validated, &ctx.db_pool)
            .await
            .map_err(to_field_error)
    }

    async fn unread_notification_count(ctx: &GraphQLContext) -> FieldResult<i32> {
        let user = ctx.require_user()?;
        let count = Notification::count_unread(user.user_id, &ctx.db_pool)
            .await
            .map_err(|e| to_field_error(e.into()))?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }

    async fn notification_preferences(
        ctx: &GraphQLContext,
    ) -> FieldResult<NotificationPreferencesData> {
        let user = ctx.require_user()?;
        let prefs = notification_actions::get_notification_preferences(user.user_id, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(NotificationPreferencesData::from(&prefs))
    }

    // =========================================================================
    // Activity Queries
    // =========================================================================

    /// Own activity plus activity of followed users
    async fn activity_feed(ctx: &GraphQLContext, limit: Option<i32>) -> FieldResult<Vec<ActivityData>> {
        let user = ctx.require_user()?;
        activity_actions::get_activity_feed(user.user_id, limit, &ctx.db_pool)
            .await
            .map_err(to_field_error)
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Recipe Mutations
    // =========================================================================

    /// Returns false if the recipe already was a favorite
    async fn favorite_recipe(ctx: &GraphQLContext, recipe_id: Uuid) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        recipe_actions::favorite_recipe(user.user_id, RecipeId::from_uuid(recipe_id), ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn unfavorite_recipe(ctx: &GraphQLContext, recipe_id: Uuid) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        recipe_actions::unfavorite_recipe(user.user_id, RecipeId::from_uuid(recipe_id), ctx.deps())
            .await
            .map_err(to_field_error)
    }

    /// Rate 1 to 5 stars
    async fn rate_recipe(ctx: &GraphQLContext, recipe_id: Uuid, rating: i32) -> FieldResult<RatingData> {
        let user = ctx.require_user()?;
        let rating = recipe_actions::rate_recipe(
            user.user_id,
            RecipeId::from_uuid(recipe_id),
            rating,
            ctx.deps(),
        )
        .await
        .map_err(to_field_error)?;
        Ok(RatingData::from(rating))
    }

    async fn mark_recipe_cooked(ctx: &GraphQLContext, recipe_id: Uuid) -> FieldResult<CookData> {
        let user = ctx.require_user()?;
        let cook =
            recipe_actions::mark_recipe_cooked(user.user_id, RecipeId::from_uuid(recipe_id), ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(CookData::from(cook))
    }

    /// Publish one of your own drafts and notify your followers
    async fn publish_recipe(ctx: &GraphQLContext, recipe_id: Uuid) -> FieldResult<RecipeData> {
        let user = ctx.require_user()?;
        let recipe =
            recipe_actions::publish_recipe(user.user_id, RecipeId::from_uuid(recipe_id), ctx.deps())
                .await
                .map_err(to_field_error)?;
        Ok(RecipeData::from(recipe))
    }

    // =========================================================================
    // Follow Mutations
    // =========================================================================

    async fn follow_user(ctx: &GraphQLContext, user_id: Uuid) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        user_actions::follow_user(user.user_id, UserId::from_uuid(user_id), ctx.deps())
            .await
            .map_err(to_field_error)
    }

    async fn unfollow_user(ctx: &GraphQLContext, user_id: Uuid) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        user_actions::unfollow_user(user.user_id, UserId::from_uuid(user_id), ctx.deps())
            .await
            .map_err(to_field_error)
    }

    // =========================================================================
    // Notification Mutations
    // =========================================================================

    async fn mark_notification_read(
        ctx: &GraphQLContext,
        notification_id: Uuid,
    ) -> FieldResult<NotificationData> {
        let user = ctx.require_user()?;
        let notification = notification_actions::mark_notification_read(
            user.user_id,
            NotificationId::from_uuid(notification_id),
            &ctx.db_pool,
        )
        .await
        .map_err(to_field_error)?;
        Ok(NotificationData::from(notification))
    }

    /// Returns the number of notifications that were unread
    async fn mark_all_notifications_read(ctx: &GraphQLContext) -> FieldResult<i32> {
        let user = ctx.require_user()?;
        let updated = notification_actions::mark_all_notifications_read(user.user_id, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(i32::try_from(updated).unwrap_or(i32::MAX))
    }

    async fn update_notification_preferences(
        ctx: &GraphQLContext,
        input: NotificationPreferencesInput,
    ) -> FieldResult<NotificationPreferencesData> {
        let user = ctx.require_user()?;
        notification_actions::update_notification_preferences(user.user_id, input, &ctx.db_pool)
            .await
            .map_err(to_field_error)
    }

    // =========================================================================
    // Push Mutations
    // =========================================================================

    async fn register_push_token(ctx: &GraphQLContext, token: String) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        user_actions::register_push_token(user.user_id, &token, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(true)
    }

    async fn unregister_push_token(ctx: &GraphQLContext, token: String) -> FieldResult<bool> {
        let user = ctx.require_user()?;
        user_actions::unregister_push_token(user.user_id, &token, &ctx.db_pool)
            .await
            .map_err(to_field_error)
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
