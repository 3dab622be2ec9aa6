//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod opensearch_client;
pub mod posthog_client;
pub mod revalidate_client;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use opensearch_client::OpenSearchClient;
pub use posthog_client::{NoopAnalytics, PostHogClient};
pub use revalidate_client::{NoopCacheInvalidator, RevalidateClient};
pub use test_dependencies::TestDependencies;
pub use traits::*;
