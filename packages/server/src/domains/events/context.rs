use crate::common::{ProfileId, UserId};
use crate::domains::notifications::NotificationPreferences;
use crate::domains::users::{Profile, User};

use super::payloads::AppEvent;

/// Label shown instead of a name when the actor hides their activity
pub const ANONYMOUS_ACTOR_LABEL: &str = "Jemand";

/// Who triggered an event, as other users get to see it
#[derive(Debug, Clone, PartialEq)]
pub struct ActorIdentity {
    pub user_id: UserId,
    pub profile_id: Option<ProfileId>,
    pub label: String,
    pub anonymized: bool,
}

impl ActorIdentity {
    /// Nickname, then account name; masked when the profile hides activity.
    pub fn resolve(user: &User, profile: Option<&Profile>) -> Self {
        let anonymized = profile.map(|p| !p.show_in_activity).unwrap_or(false);

        let label = if anonymized {
            ANONYMOUS_ACTOR_LABEL.to_string()
        } else {
            display_name(user, profile)
                .unwrap_or(ANONYMOUS_ACTOR_LABEL)
                .to_string()
        };

        Self {
            user_id: user.id,
            profile_id: profile.map(|p| p.id),
            label,
            anonymized,
        }
    }
}

/// Non-blank nickname, else non-blank account name
pub fn display_name<'a>(user: &'a User, profile: Option<&'a Profile>) -> Option<&'a str> {
    profile
        .and_then(|p| non_blank(p.nickname.as_deref()))
        .or_else(|| non_blank(user.name.as_deref()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Runtime input for gating and for the notification templates
#[derive(Debug, Clone)]
pub struct NotificationContext<'a> {
    pub actor_id: UserId,
    pub actor_label: &'a str,
    pub actor_anonymized: bool,
    pub event: &'a AppEvent,
    pub recipient_id: Option<UserId>,
    /// `None` when no preference profile was loaded; every key then resolves
    /// to its default
    pub recipient_preferences: Option<&'a NotificationPreferences>,
}

impl<'a> NotificationContext<'a> {
    pub fn new(actor: &'a ActorIdentity, event: &'a AppEvent) -> Self {
        Self {
            actor_id: actor.user_id,
            actor_label: &actor.label,
            actor_anonymized: actor.anonymized,
            event,
            recipient_id: None,
            recipient_preferences: None,
        }
    }

    pub fn with_recipient(
        mut self,
        recipient_id: Option<UserId>,
        preferences: Option<&'a NotificationPreferences>,
    ) -> Self {
        self.recipient_id = recipient_id;
        self.recipient_preferences = preferences;
        self
    }

    /// Recipient of a notification: the explicit one, or the actor
    pub fn effective_recipient(&self) -> UserId {
        self.recipient_id.unwrap_or(self.actor_id)
    }
}
