//! Events domain - fan-out of application events into activity, notification
//! and tracking side effects.
//!
//! ```text
//! action / internal route
//!     └─► fire_event(FireEvent { event: AppEvent, actor_id, recipient_id, .. })
//!             ├─► ActorIdentity::load          (ACTOR_NOT_FOUND before any write)
//!             ├─► AppEvent::definition()       (static table, one arm per event)
//!             ├─► ActivityLog::create          (unless skip_activity)
//!             ├─► should_create_notification → Notification::create → push
//!             ├─► analytics.track              (best-effort)
//!             └─► cache.revalidate_path        (best-effort)
//! ```

pub mod context;
pub mod definition;
pub mod errors;
pub mod fire;
pub mod gating;
pub mod names;
pub mod payloads;

pub use context::{display_name, ActorIdentity, NotificationContext, ANONYMOUS_ACTOR_LABEL};
pub use definition::{
    ActivityFacet, EventDefinition, NotificationContent, NotificationFacet, TrackingFacet,
};
pub use errors::EventError;
pub use fire::{fire_event, FireEvent, FireEventResult};
pub use gating::should_create_notification;
pub use names::{EventName, UnknownEventName};
pub use payloads::{Activation, AppEvent, FollowedUser, RecipeComment, RecipeRating, RecipeRef, Registration};
