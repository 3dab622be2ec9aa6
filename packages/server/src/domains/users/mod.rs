//! Users domain - accounts, public profiles, follows and push subscriptions
//!
//! Accounts are created by the frontend's auth flow; this service reads them to
//! resolve actor labels and recipient preferences, and owns the follow graph.

pub mod actions;
pub mod models;

pub use models::{Follow, Profile, PushSubscription, User};
