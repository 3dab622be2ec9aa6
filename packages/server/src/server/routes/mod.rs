// HTTP routes
pub mod graphql;
pub mod health;
pub mod internal_events;

pub use graphql::*;
pub use health::*;
pub use internal_events::*;
