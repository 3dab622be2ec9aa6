// Business domains
pub mod activity;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod recipes;
pub mod search;
pub mod users;
