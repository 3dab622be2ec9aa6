// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (gating, templates, document building) lives in the domains
// and talks to the outside world through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAnalytics, BaseSearchIndex)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::common::ProfileId;

// =============================================================================
// Analytics Trait (product tracking)
// =============================================================================

#[async_trait]
pub trait BaseAnalytics: Send + Sync {
    /// Record a server-side product event attributed to a profile
    async fn track(&self, event: &str, properties: Value, profile_id: Option<ProfileId>)
        -> Result<()>;
}

// =============================================================================
// Cache Invalidation Trait (frontend revalidation)
// =============================================================================

#[async_trait]
pub trait BaseCacheInvalidator: Send + Sync {
    /// Ask the frontend to drop cached renders of `path`
    async fn revalidate_path(&self, path: &str) -> Result<()>;
}

// =============================================================================
// Push Notification Trait
// =============================================================================

/// One push message addressed to a single device token
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub push_token: String,
    pub title: String,
    pub body: String,
    pub data: Value,
}

#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Send messages in as few requests as the provider allows
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<()>;
}

// =============================================================================
// Search Index Trait
// =============================================================================

/// A single write in a bulk request
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Create or replace the document with this id
    Index { id: String, document: Value },
    /// Remove the document; a missing document is not an error
    Delete { id: String },
}

impl BulkOperation {
    pub fn id(&self) -> &str {
        match self {
            BulkOperation::Index { id, .. } | BulkOperation::Delete { id } => id,
        }
    }
}

/// A bulk item the search engine rejected
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemFailure {
    pub id: String,
    pub status: u16,
    pub reason: String,
}

/// Per-item result summary of one bulk call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failures: Vec<BulkItemFailure>,
}

#[async_trait]
pub trait BaseSearchIndex: Send + Sync {
    /// Check that the search engine answers
    async fn ping(&self) -> Result<()>;

    /// Create the index with its mappings if it does not exist yet
    async fn ensure_index(&self) -> Result<()>;

    /// Apply a batch of writes. Transport errors are `Err`; per-item
    /// rejections are reported in the outcome.
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkOutcome>;
}
