// Rezeptbuch - API Core
//
// Backend for the recipe-sharing platform: event fan-out (activity, notification,
// tracking), the social actions that fire those events, and the incremental
// OpenSearch synchronisation of published recipes.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
