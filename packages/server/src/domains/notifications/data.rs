//! GraphQL types for notifications and preference settings

use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use uuid::Uuid;

use super::preferences::{NotificationPreferenceKey, NotificationPreferences};
use super::Notification;
use crate::common::PageInfo;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "An in-app notification")]
pub struct NotificationData {
    pub id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    /// Event payload as a JSON string (links to recipe, actor, ...)
    pub data: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationData {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.into_uuid(),
            read: n.is_read(),
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            data: n.data.map(|d| d.to_string()),
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct NotificationConnection {
    pub nodes: Vec<NotificationData>,
    pub page_info: PageInfo,
}

/// Resolved flags (explicit value or default) for the settings page
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
pub struct NotificationPreferencesData {
    pub notify_on_recipe_like: bool,
    pub notify_on_recipe_rating: bool,
    pub notify_on_recipe_cooked: bool,
    pub notify_on_recipe_comment: bool,
    pub notify_on_new_follower: bool,
    pub notify_on_new_recipe: bool,
    pub notify_on_system_messages: bool,
    pub notify_on_anonymous: bool,
}

impl From<&NotificationPreferences> for NotificationPreferencesData {
    fn from(prefs: &NotificationPreferences) -> Self {
        use NotificationPreferenceKey::*;
        Self {
            notify_on_recipe_like: prefs.resolve(NotifyOnRecipeLike),
            notify_on_recipe_rating: prefs.resolve(NotifyOnRecipeRating),
            notify_on_recipe_cooked: prefs.resolve(NotifyOnRecipeCooked),
            notify_on_recipe_comment: prefs.resolve(NotifyOnRecipeComment),
            notify_on_new_follower: prefs.resolve(NotifyOnNewFollower),
            notify_on_new_recipe: prefs.resolve(NotifyOnNewRecipe),
            notify_on_system_messages: prefs.resolve(NotifyOnSystemMessages),
            notify_on_anonymous: prefs.notify_on_anonymous(),
        }
    }
}

/// Partial update; omitted fields keep their stored value
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct NotificationPreferencesInput {
    pub notify_on_recipe_like: Option<bool>,
    pub notify_on_recipe_rating: Option<bool>,
    pub notify_on_recipe_cooked: Option<bool>,
    pub notify_on_recipe_comment: Option<bool>,
    pub notify_on_new_follower: Option<bool>,
    pub notify_on_new_recipe: Option<bool>,
    pub notify_on_system_messages: Option<bool>,
    pub notify_on_anonymous: Option<bool>,
}

impl NotificationPreferencesInput {
    /// Only the flags the caller actually set
    pub fn into_changes(self) -> NotificationPreferences {
        use NotificationPreferenceKey::*;
        let mut changes = NotificationPreferences::new();
        let flags = [
            (NotifyOnRecipeLike, self.notify_on_recipe_like),
            (NotifyOnRecipeRating, self.notify_on_recipe_rating),
            (NotifyOnRecipeCooked, self.notify_on_recipe_cooked),
            (NotifyOnRecipeComment, self.notify_on_recipe_comment),
            (NotifyOnNewFollower, self.notify_on_new_follower),
            (NotifyOnNewRecipe, self.notify_on_new_recipe),
            (NotifyOnSystemMessages, self.notify_on_system_messages),
        ];
        for (key, value) in flags {
            if let Some(enabled) = value {
                changes.set(key, enabled);
            }
        }
        if let Some(enabled) = self.notify_on_anonymous {
            changes.set_notify_on_anonymous(enabled);
        }
        changes
    }
}
