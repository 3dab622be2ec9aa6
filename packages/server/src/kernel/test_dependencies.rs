// TestDependencies - spy implementations for testing
//
// Records every call made to the external-service traits so tests can assert
// on tracking, revalidation, push and search-index traffic without a network.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    BaseAnalytics, BaseCacheInvalidator, BasePushNotificationService, BaseSearchIndex,
    BulkItemFailure, BulkOperation, BulkOutcome, PushMessage, ServerDeps,
};
use crate::common::ProfileId;

// =============================================================================
// Spy behaviour
// =============================================================================

/// How a spy answers after recording a call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpyMode {
    #[default]
    Succeed,
    /// Return an error
    Fail,
    /// Never answer (sleeps far beyond any test timeout)
    Stall,
}

impl SpyMode {
    async fn respond(self, what: &str) -> Result<()> {
        match self {
            SpyMode::Succeed => Ok(()),
            SpyMode::Fail => anyhow::bail!("{} unavailable", what),
            SpyMode::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

// =============================================================================
// Spy Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub event: String,
    pub properties: Value,
    pub profile_id: Option<ProfileId>,
}

#[derive(Default)]
pub struct SpyAnalytics {
    events: Mutex<Vec<TrackedEvent>>,
    mode: SpyMode,
}

impl SpyAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls but returns an error from every `track`
    pub fn failing() -> Self {
        Self::with_mode(SpyMode::Fail)
    }

    /// Records calls but never returns from `track`
    pub fn stalled() -> Self {
        Self::with_mode(SpyMode::Stall)
    }

    fn with_mode(mode: SpyMode) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            mode,
        }
    }

    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseAnalytics for SpyAnalytics {
    async fn track(&self, event: &str, properties: Value, profile_id: Option<ProfileId>) -> Result<()> {
        self.events.lock().unwrap().push(TrackedEvent {
            event: event.to_string(),
            properties,
            profile_id,
        });
        self.mode.respond("analytics").await
    }
}

// =============================================================================
// Spy Cache Invalidator
// =============================================================================

#[derive(Default)]
pub struct SpyCacheInvalidator {
    paths: Mutex<Vec<String>>,
    mode: SpyMode,
}

impl SpyCacheInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            paths: Mutex::new(Vec::new()),
            mode: SpyMode::Fail,
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseCacheInvalidator for SpyCacheInvalidator {
    async fn revalidate_path(&self, path: &str) -> Result<()> {
        self.paths.lock().unwrap().push(path.to_string());
        self.mode.respond("frontend").await
    }
}

// =============================================================================
// Spy Push Service
// =============================================================================

#[derive(Default)]
pub struct SpyPushService {
    sent: Mutex<Vec<PushMessage>>,
    mode: SpyMode,
}

impl SpyPushService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self::with_mode(SpyMode::Fail)
    }

    pub fn stalled() -> Self {
        Self::with_mode(SpyMode::Stall)
    }

    fn with_mode(mode: SpyMode) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            mode,
        }
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePushNotificationService for SpyPushService {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<()> {
        self.sent.lock().unwrap().extend_from_slice(messages);
        self.mode.respond("push").await
    }
}

// =============================================================================
// In-memory Search Index
// =============================================================================

/// Keeps the indexed document set; ids in `rejected` fail
#[derive(Default)]
pub struct InMemorySearchIndex {
    documents: Mutex<std::collections::HashMap<String, Value>>,
    rejected: Mutex<HashSet<String>>,
    ensured: Mutex<bool>,
    unreachable: Mutex<bool>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every bulk item with this id fail with a 400
    pub fn reject(&self, id: &str) {
        self.rejected.lock().unwrap().insert(id.to_string());
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    /// Make `ping` fail from now on
    pub fn set_unreachable(&self) {
        *self.unreachable.lock().unwrap() = true;
    }

    pub fn was_ensured(&self) -> bool {
        *self.ensured.lock().unwrap()
    }
}

#[async_trait]
impl BaseSearchIndex for InMemorySearchIndex {
    async fn ping(&self) -> Result<()> {
        if *self.unreachable.lock().unwrap() {
            anyhow::bail!("search index unreachable");
        }
        Ok(())
    }

    async fn ensure_index(&self) -> Result<()> {
        *self.ensured.lock().unwrap() = true;
        Ok(())
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkOutcome> {
        let rejected = self.rejected.lock().unwrap().clone();
        let mut documents = self.documents.lock().unwrap();
        let mut outcome = BulkOutcome::default();

        for op in operations {
            if rejected.contains(op.id()) {
                outcome.failures.push(BulkItemFailure {
                    id: op.id().to_string(),
                    status: 400,
                    reason: "rejected by test index".to_string(),
                });
                continue;
            }
            match op {
                BulkOperation::Index { id, document } => {
                    documents.insert(id.clone(), document.clone());
                }
                BulkOperation::Delete { id } => {
                    documents.remove(id);
                }
            }
            outcome.succeeded += 1;
        }

        Ok(outcome)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of spies plus the `ServerDeps` that uses them
pub struct TestDependencies {
    pub analytics: Arc<SpyAnalytics>,
    pub cache: Arc<SpyCacheInvalidator>,
    pub push: Arc<SpyPushService>,
    pub search_index: Arc<InMemorySearchIndex>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            analytics: Arc::new(SpyAnalytics::new()),
            cache: Arc::new(SpyCacheInvalidator::new()),
            push: Arc::new(SpyPushService::new()),
            search_index: Arc::new(InMemorySearchIndex::new()),
        }
    }

    pub fn with_analytics(mut self, analytics: SpyAnalytics) -> Self {
        self.analytics = Arc::new(analytics);
        self
    }

    pub fn with_cache(mut self, cache: SpyCacheInvalidator) -> Self {
        self.cache = Arc::new(cache);
        self
    }

    pub fn with_push(mut self, push: SpyPushService) -> Self {
        self.push = Arc::new(push);
        self
    }

    pub fn server_deps(&self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            self.analytics.clone(),
            self.cache.clone(),
            self.push.clone(),
            self.search_index.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
