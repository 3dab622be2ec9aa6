//! Typed ID definitions for all domain entities.

pub use super::id::Id;

/// Marker type for User entities.
pub struct User;

/// Marker type for Profile entities.
pub struct Profile;

/// Marker type for Recipe entities.
pub struct Recipe;

/// Marker type for recipe comments (owned by the frontend, referenced by events).
pub struct Comment;

/// Marker type for ActivityLog entities.
pub struct ActivityLog;

/// Marker type for Notification entities.
pub struct Notification;

/// Marker type for PushSubscription entities.
pub struct PushSubscription;

pub type UserId = Id<User>;
pub type ProfileId = Id<Profile>;
pub type RecipeId = Id<Recipe>;
pub type CommentId = Id<Comment>;
pub type ActivityLogId = Id<ActivityLog>;
pub type NotificationId = Id<Notification>;
pub type PushSubscriptionId = Id<PushSubscription>;
