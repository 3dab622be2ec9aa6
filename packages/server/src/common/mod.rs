// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;
pub mod utils;

pub use auth::AuthError;
pub use entity_ids::*;
pub use errors::ActionError;
pub use id::Id;
pub use pagination::{build_page_info, trim_results, Cursor, PageInfo, PaginationArgs, ValidatedPaginationArgs};
