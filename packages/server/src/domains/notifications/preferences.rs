//! Per-user notification opt-in flags.
//!
//! Profiles store a sparse JSON map (`{"notifyOnRecipeLike": false, ...}`). A
//! key missing from the map resolves to its entry in [`DEFAULT_PREFERENCES`],
//! so adding a category never requires a data migration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flag that lets a user receive notifications caused by anonymized actors
pub const NOTIFY_ON_ANONYMOUS: &str = "notifyOnAnonymous";

/// One boolean opt-in flag per notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationPreferenceKey {
    NotifyOnRecipeLike,
    NotifyOnRecipeRating,
    NotifyOnRecipeCooked,
    NotifyOnRecipeComment,
    NotifyOnNewFollower,
    NotifyOnNewRecipe,
    NotifyOnSystemMessages,
}

/// Defaults used when a user has no explicit value for a category
pub const DEFAULT_PREFERENCES: [(NotificationPreferenceKey, bool); 7] = [
    (NotificationPreferenceKey::NotifyOnRecipeLike, true),
    (NotificationPreferenceKey::NotifyOnRecipeRating, true),
    (NotificationPreferenceKey::NotifyOnRecipeCooked, true),
    (NotificationPreferenceKey::NotifyOnRecipeComment, true),
    (NotificationPreferenceKey::NotifyOnNewFollower, true),
    (NotificationPreferenceKey::NotifyOnNewRecipe, true),
    (NotificationPreferenceKey::NotifyOnSystemMessages, true),
];

impl NotificationPreferenceKey {
    pub const ALL: [NotificationPreferenceKey; 7] = [
        NotificationPreferenceKey::NotifyOnRecipeLike,
        NotificationPreferenceKey::NotifyOnRecipeRating,
        NotificationPreferenceKey::NotifyOnRecipeCooked,
        NotificationPreferenceKey::NotifyOnRecipeComment,
        NotificationPreferenceKey::NotifyOnNewFollower,
        NotificationPreferenceKey::NotifyOnNewRecipe,
        NotificationPreferenceKey::NotifyOnSystemMessages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPreferenceKey::NotifyOnRecipeLike => "notifyOnRecipeLike",
            NotificationPreferenceKey::NotifyOnRecipeRating => "notifyOnRecipeRating",
            NotificationPreferenceKey::NotifyOnRecipeCooked => "notifyOnRecipeCooked",
            NotificationPreferenceKey::NotifyOnRecipeComment => "notifyOnRecipeComment",
            NotificationPreferenceKey::NotifyOnNewFollower => "notifyOnNewFollower",
            NotificationPreferenceKey::NotifyOnNewRecipe => "notifyOnNewRecipe",
            NotificationPreferenceKey::NotifyOnSystemMessages => "notifyOnSystemMessages",
        }
    }

    pub fn default_value(&self) -> bool {
        DEFAULT_PREFERENCES
            .iter()
            .find(|(key, _)| key == self)
            .map(|(_, enabled)| *enabled)
            .unwrap_or(true)
    }
}

impl fmt::Display for NotificationPreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPreferenceKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid notification preference key: {}", s))
    }
}

/// Snapshot of a user's explicit flags (sparse)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPreferences(BTreeMap<String, bool>);

impl NotificationPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit value for a category, if the user ever set one
    pub fn get(&self, key: NotificationPreferenceKey) -> Option<bool> {
        self.0.get(key.as_str()).copied()
    }

    /// Explicit value or the category default
    pub fn resolve(&self, key: NotificationPreferenceKey) -> bool {
        self.get(key).unwrap_or_else(|| key.default_value())
    }

    /// Opt-in for notifications from anonymized actors (default off)
    pub fn notify_on_anonymous(&self) -> bool {
        self.0.get(NOTIFY_ON_ANONYMOUS).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: NotificationPreferenceKey, enabled: bool) -> &mut Self {
        self.0.insert(key.as_str().to_string(), enabled);
        self
    }

    pub fn set_notify_on_anonymous(&mut self, enabled: bool) -> &mut Self {
        self.0.insert(NOTIFY_ON_ANONYMOUS.to_string(), enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
