//! Fire event action - the single entry point for event side effects

use anyhow::Context;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use super::context::{ActorIdentity, NotificationContext};
use super::errors::EventError;
use super::gating::should_create_notification;
use super::payloads::AppEvent;
use crate::common::utils::json::{merge_objects, with_leading_key};
use crate::common::{ProfileId, UserId};
use crate::domains::activity::{ActivityLog, CreateActivityLog};
use crate::domains::notifications::models::notification::CreateNotification;
use crate::domains::notifications::{Notification, NotificationPreferences};
use crate::domains::users::{Profile, PushSubscription, User};
use crate::kernel::{PushMessage, ServerDeps};

/// Input of [`fire_event`]
#[derive(Debug, Clone, TypedBuilder)]
pub struct FireEvent {
    pub event: AppEvent,
    pub actor_id: UserId,
    #[builder(default, setter(strip_option))]
    pub recipient_id: Option<UserId>,
    /// Shallow-merged over the definition's activity metadata
    #[builder(default, setter(strip_option))]
    pub metadata: Option<Value>,
    #[builder(default)]
    pub revalidate_paths: Vec<String>,
    /// Shallow-merged over the definition's tracking properties
    #[builder(default, setter(strip_option))]
    pub track_properties: Option<Value>,
    #[builder(default)]
    pub skip_activity: bool,
    /// For fan-out copies of an event that was already tracked once
    #[builder(default)]
    pub skip_tracking: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FireEventResult {
    pub activity: Option<ActivityLog>,
    pub notification: Option<Notification>,
}

/// Record the activity, create the gated notification and emit tracking for
/// one event.
///
/// Only the actor lookup and the two row inserts can fail the call; push,
/// analytics and revalidation are logged and swallowed, and together they
/// never take longer than `deps.side_effect_timeout`.
pub async fn fire_event(input: FireEvent, deps: &ServerDeps) -> Result<FireEventResult, EventError> {
    let pool = &deps.db_pool;
    let event_name = input.event.name();
    debug!(event = %event_name, actor_id = %input.actor_id, "Firing event");

    // 1. Resolve the actor before writing anything
    let user = User::find_by_id(input.actor_id, pool)
        .await
        .context("Failed to load actor")?
        .ok_or(EventError::ActorNotFound(input.actor_id))?;
    let actor_profile = Profile::find_by_user_id(user.id, pool)
        .await
        .context("Failed to load actor profile")?;
    let actor = ActorIdentity::resolve(&user, actor_profile.as_ref());

    let definition = input.event.definition();

    // 2. Recipient preferences (only when a notification could be created)
    let recipient_preferences: Option<NotificationPreferences> = match (
        &definition.notification,
        input.recipient_id,
    ) {
        (Some(_), Some(recipient_id)) if recipient_id != actor.user_id => {
            Profile::find_by_user_id(recipient_id, pool)
                .await
                .context("Failed to load recipient profile")?
                .map(|profile| profile.notification_preferences.0)
        }
        (Some(_), _) => actor_profile.map(|profile| profile.notification_preferences.0),
        (None, _) => None,
    };

    let ctx = NotificationContext::new(&actor, &input.event)
        .with_recipient(input.recipient_id, recipient_preferences.as_ref());

    let mut result = FireEventResult::default();

    // 3. Activity log
    if !input.skip_activity {
        let facet = &definition.activity;
        let metadata = merge_objects(
            facet.metadata.as_ref().map(|extract| extract(&ctx)),
            input.metadata.clone(),
        );

        let activity = ActivityLog::create(
            CreateActivityLog {
                user_id: actor.user_id,
                activity_type: facet.activity_type,
                target_type: facet.target_type,
                target_id: (facet.target_id)(&ctx),
                metadata,
            },
            pool,
        )
        .await
        .context("Failed to write activity log")?;

        result.activity = Some(activity);
    }

    // 4. Gated notification
    if let Some(facet) = &definition.notification {
        if should_create_notification(&ctx, facet.notification_type, facet.preference_key) {
            let payload = match &facet.payload {
                Some(extract) => extract(&ctx),
                None => with_leading_key("actorId", json!(actor.user_id), input.event.data()),
            };
            let content = (facet.template)(&ctx);

            let notification = Notification::create(
                CreateNotification {
                    user_id: ctx.effective_recipient(),
                    notification_type: facet.notification_type,
                    title: content.title,
                    message: content.message,
                    data: Some(payload),
                },
                pool,
            )
            .await
            .context("Failed to create notification")?;

            result.notification = Some(notification);
        } else {
            debug!(
                event = %event_name,
                recipient_id = %ctx.effective_recipient(),
                "Notification suppressed"
            );
        }
    }

    // 5. Push, tracking and revalidation are best-effort and share one time
    // budget so a stalled provider cannot hold the request open
    let tracking = definition
        .tracking
        .as_ref()
        .filter(|_| !input.skip_tracking)
        .map(|tracking| {
            let properties = merge_objects(
                tracking.properties.as_ref().map(|extract| extract(&ctx)),
                input.track_properties.clone(),
            )
            .unwrap_or_else(|| json!({}));
            (tracking.event, properties)
        });

    let side_effects = async {
        tokio::join!(
            push_notification(result.notification.as_ref(), deps),
            track_event(tracking, actor.profile_id, deps),
            revalidate_paths(&input.revalidate_paths, deps),
        )
    };
    if tokio::time::timeout(deps.side_effect_timeout, side_effects)
        .await
        .is_err()
    {
        warn!(
            event = %event_name,
            timeout_ms = deps.side_effect_timeout.as_millis() as u64,
            "Best-effort side effects timed out"
        );
    }

    info!(
        event = %event_name,
        actor_id = %actor.user_id,
        activity = result.activity.is_some(),
        notification = result.notification.is_some(),
        "Event fired"
    );

    Ok(result)
}

/// Deliver a freshly created notification to the recipient's devices
async fn push_notification(notification: Option<&Notification>, deps: &ServerDeps) {
    let Some(notification) = notification else {
        return;
    };

    let subscriptions = match PushSubscription::find_by_user(notification.user_id, &deps.db_pool).await {
        Ok(subscriptions) => subscriptions,
        Err(e) => {
            warn!(user_id = %notification.user_id, error = %e, "Failed to load push subscriptions");
            return;
        }
    };

    if subscriptions.is_empty() {
        return;
    }

    let data = merge_objects(
        Some(json!({
            "notificationId": notification.id,
            "type": notification.notification_type,
        })),
        notification.data.clone(),
    )
    .unwrap_or_else(|| json!({}));

    let messages: Vec<PushMessage> = subscriptions
        .into_iter()
        .map(|subscription| PushMessage {
            push_token: subscription.expo_push_token,
            title: notification.title.clone(),
            body: notification.message.clone(),
            data: data.clone(),
        })
        .collect();

    if let Err(e) = deps.push_service.send_batch(&messages).await {
        warn!(
            notification_id = %notification.id,
            error = %e,
            "Push delivery failed"
        );
    }
}

async fn track_event(
    tracking: Option<(&'static str, Value)>,
    profile_id: Option<ProfileId>,
    deps: &ServerDeps,
) {
    let Some((event, properties)) = tracking else {
        return;
    };

    if let Err(e) = deps.analytics.track(event, properties, profile_id).await {
        warn!(event, error = %e, "Analytics tracking failed");
    }
}

/// Revalidated one after another, in the order given
async fn revalidate_paths(paths: &[String], deps: &ServerDeps) {
    for path in paths {
        if let Err(e) = deps.cache.revalidate_path(path).await {
            warn!(path = %path, error = %e, "Revalidation failed");
        }
    }
}
