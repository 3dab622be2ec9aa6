use crate::domains::notifications::{NotificationPreferenceKey, NotificationType};

use super::context::NotificationContext;

/// Decide whether a notification may be created.
///
/// 1. self-notifications only for `SYSTEM`
/// 2. explicit preference flag, else the category default
/// 3. anonymized actors only reach recipients with `notifyOnAnonymous`
pub fn should_create_notification(
    ctx: &NotificationContext<'_>,
    notification_type: NotificationType,
    preference_key: NotificationPreferenceKey,
) -> bool {
    if ctx.effective_recipient() == ctx.actor_id && notification_type != NotificationType::System {
        return false;
    }

    let enabled = ctx
        .recipient_preferences
        .and_then(|prefs| prefs.get(preference_key))
        .unwrap_or_else(|| preference_key.default_value());
    if !enabled {
        return false;
    }

    if ctx.actor_anonymized {
        return ctx
            .recipient_preferences
            .map(|prefs| prefs.notify_on_anonymous())
            .unwrap_or(false);
    }

    true
}
