//! Server dependencies for actions (using traits for testability)
//!
//! Central dependency container passed to the event dispatcher, the social
//! actions and the search sync. All external services sit behind the Base*
//! traits so tests can swap in spies.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::common::utils::ExpoClient;
use crate::domains::search::RecipeDocument;
use crate::kernel::{
    BaseAnalytics, BaseCacheInvalidator, BasePushNotificationService, BaseSearchIndex,
    NoopAnalytics, NoopCacheInvalidator, OpenSearchClient, PostHogClient, RevalidateClient,
};

/// Upper bound for each best-effort call (push, tracking, revalidation) made
/// while handling a request
pub const DEFAULT_SIDE_EFFECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub analytics: Arc<dyn BaseAnalytics>,
    pub cache: Arc<dyn BaseCacheInvalidator>,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub search_index: Arc<dyn BaseSearchIndex>,
    pub side_effect_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        analytics: Arc<dyn BaseAnalytics>,
        cache: Arc<dyn BaseCacheInvalidator>,
        push_service: Arc<dyn BasePushNotificationService>,
        search_index: Arc<dyn BaseSearchIndex>,
    ) -> Self {
        Self {
            db_pool,
            analytics,
            cache,
            push_service,
            search_index,
            side_effect_timeout: DEFAULT_SIDE_EFFECT_TIMEOUT,
        }
    }

    pub fn with_side_effect_timeout(mut self, timeout: Duration) -> Self {
        self.side_effect_timeout = timeout;
        self
    }

    /// Wire production clients from configuration.
    ///
    /// Optional integrations (PostHog, revalidation) fall back to no-op
    /// implementations when unconfigured.
    pub fn from_config(db_pool: PgPool, config: &Config) -> Result<Self> {
        let analytics: Arc<dyn BaseAnalytics> = match &config.posthog_api_key {
            Some(key) => Arc::new(PostHogClient::new(key.clone(), config.posthog_host.clone())?),
            None => Arc::new(NoopAnalytics),
        };

        let cache: Arc<dyn BaseCacheInvalidator> = match &config.revalidate_url {
            Some(url) => Arc::new(RevalidateClient::new(
                url.clone(),
                config.revalidate_secret.clone(),
            )?),
            None => Arc::new(NoopCacheInvalidator),
        };

        let search_index = Arc::new(OpenSearchClient::new(
            &config.search.url,
            &config.search.index,
            config.search.username.clone(),
            config.search.password.clone(),
            RecipeDocument::index_definition(),
        )?);

        Ok(Self::new(
            db_pool,
            analytics,
            cache,
            Arc::new(ExpoClient::new(config.expo_access_token.clone())?),
            search_index,
        ))
    }
}
