//! User actions - follow graph and device registration

mod follows;
mod push_tokens;

pub use follows::{follow_user, unfollow_user};
pub use push_tokens::{register_push_token, unregister_push_token};
