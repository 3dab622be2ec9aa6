//! Notifications domain - in-app notification rows, preference flags and push
//! delivery.
//!
//! Rows are created only by the event dispatcher (`domains::events`); this
//! domain owns reading, marking as read and the per-user opt-in flags.

pub mod actions;
pub mod data;
pub mod models;
pub mod preferences;

pub use models::notification::{Notification, NotificationType};
pub use preferences::{NotificationPreferenceKey, NotificationPreferences};
