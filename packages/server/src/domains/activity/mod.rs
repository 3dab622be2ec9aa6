//! Activity domain - append-only log of user actions for the social feed

pub mod actions;
pub mod data;
pub mod models;

pub use models::activity_log::{ActivityLog, ActivityType, CreateActivityLog, TargetType};
