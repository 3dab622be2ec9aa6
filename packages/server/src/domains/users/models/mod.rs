pub mod follow;
pub mod profile;
pub mod push_subscription;
pub mod user;

pub use follow::Follow;
pub use profile::Profile;
pub use push_subscription::PushSubscription;
pub use user::User;
