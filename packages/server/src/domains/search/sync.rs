//! Cursor-paginated sync loop.
//!
//! Each batch is fetched after the cursor, written with one bulk call and the
//! cursor is then persisted at the batch's last row, even if some bulk items
//! failed. A cycle ends on the first short page.
//!
//! Runners in different processes may share a cursor name: a cycle holds a
//! Postgres advisory lock for its duration and the stored cursor only ever
//! moves forward.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{RecipeDocument, RecipeSearchRow, SyncCursor};
use crate::kernel::{BaseSearchIndex, BulkOperation, ServerDeps};

/// Cursor name of the recipe index sync
pub const DEFAULT_SYNC_NAME: &str = "recipes";

/// Counters of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub batches: usize,
    pub indexed: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Another runner held the lock; nothing was done
    pub skipped: bool,
}

impl SyncStats {
    pub fn processed(&self) -> usize {
        self.indexed + self.deleted + self.failed
    }
}

/// What a single batch did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub fetched: usize,
    pub indexed: usize,
    pub deleted: usize,
    pub failed: usize,
}

pub struct SearchSync {
    pool: PgPool,
    index: Arc<dyn BaseSearchIndex>,
    batch_size: i64,
    name: String,
}

impl SearchSync {
    pub fn new(deps: &ServerDeps, batch_size: i64) -> Self {
        Self::with_index(deps.db_pool.clone(), deps.search_index.clone(), batch_size)
    }

    /// Without the rest of the server dependencies (standalone binary)
    pub fn with_index(pool: PgPool, index: Arc<dyn BaseSearchIndex>, batch_size: i64) -> Self {
        Self {
            pool,
            index,
            batch_size: batch_size.max(1),
            name: DEFAULT_SYNC_NAME.to_string(),
        }
    }

    /// Use a separate cursor (e.g. to rebuild into a fresh index)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Restart from the epoch on the next cycle (full reindex)
    pub async fn reset(&self) -> Result<()> {
        SyncCursor::reset(&self.name, &self.pool).await?;
        info!(sync = %self.name, "Search sync cursor reset");
        Ok(())
    }

    /// Key of the session-level advisory lock held during a cycle
    pub fn advisory_lock_key(&self) -> String {
        format!("search_sync:{}", self.name)
    }

    /// Drain all changes since the stored cursor, unless another runner on the
    /// same cursor name is mid-cycle
    pub async fn run_cycle(&self) -> Result<SyncStats> {
        let key = self.advisory_lock_key();
        let mut lock_conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire lock connection")?;

        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock(hashtext($1)::bigint)")
            .bind(&key)
            .fetch_one(&mut *lock_conn)
            .await
            .context("Failed to take search sync lock")?;

        if !locked {
            info!(sync = %self.name, "Another search sync runner is active, skipping cycle");
            return Ok(SyncStats {
                skipped: true,
                ..Default::default()
            });
        }

        let result = self.drain().await;

        if let Err(e) = sqlx::query("SELECT pg_advisory_unlock(hashtext($1)::bigint)")
            .bind(&key)
            .execute(&mut *lock_conn)
            .await
        {
            // closing the session releases the lock
            error!(sync = %self.name, error = %e, "Failed to release search sync lock");
            lock_conn.close_on_drop();
        }

        result
    }

    async fn drain(&self) -> Result<SyncStats> {
        self.index
            .ensure_index()
            .await
            .context("Failed to ensure search index")?;

        let mut cursor = SyncCursor::load(&self.name, &self.pool).await?;
        let mut stats = SyncStats::default();

        loop {
            let batch = self.run_batch(&mut cursor).await?;
            if batch.fetched == 0 {
                break;
            }

            stats.batches += 1;
            stats.indexed += batch.indexed;
            stats.deleted += batch.deleted;
            stats.failed += batch.failed;

            if (batch.fetched as i64) < self.batch_size {
                break;
            }
        }

        if stats.batches > 0 {
            info!(
                sync = %self.name,
                batches = stats.batches,
                indexed = stats.indexed,
                deleted = stats.deleted,
                failed = stats.failed,
                "Search sync cycle complete"
            );
        } else {
            debug!(sync = %self.name, "Search index up to date");
        }

        Ok(stats)
    }

    /// Process one page after `cursor` and persist the advanced cursor
    pub async fn run_batch(&self, cursor: &mut SyncCursor) -> Result<BatchStats> {
        let rows = RecipeSearchRow::find_changed_since(cursor, self.batch_size, &self.pool)
            .await
            .context("Failed to fetch changed recipes")?;

        let Some(last) = rows.last() else {
            return Ok(BatchStats::default());
        };
        let (last_updated_at, last_id) = (last.updated_at, last.id.into_uuid());

        let operations: Vec<BulkOperation> = rows.iter().map(RecipeDocument::operation_for).collect();
        let outcome = self.index.bulk(&operations).await.context("Bulk request failed")?;

        for failure in &outcome.failures {
            warn!(
                sync = %self.name,
                id = %failure.id,
                status = failure.status,
                reason = %failure.reason,
                "Search bulk item failed"
            );
        }

        let mut stats = BatchStats {
            fetched: rows.len(),
            failed: outcome.failures.len(),
            ..Default::default()
        };
        for op in &operations {
            if outcome.failures.iter().any(|f| f.id == op.id()) {
                continue;
            }
            match op {
                BulkOperation::Index { .. } => stats.indexed += 1,
                BulkOperation::Delete { .. } => stats.deleted += 1,
            }
        }

        cursor.advance(last_updated_at, last_id);
        if !cursor.save(&self.pool).await? {
            // another runner got further; continue from its position
            *cursor = SyncCursor::load(&self.name, &self.pool).await?;
            warn!(
                sync = %self.name,
                cursor_updated_at = %cursor.last_updated_at,
                "Stored search cursor is ahead, skipping to it"
            );
        }

        debug!(
            sync = %self.name,
            fetched = stats.fetched,
            cursor_updated_at = %cursor.last_updated_at,
            cursor_id = %cursor.last_id,
            "Search sync batch processed"
        );

        Ok(stats)
    }

    /// Run cycles forever, sleeping `interval` between them
    pub async fn run_forever(&self, interval: Duration) -> Result<()> {
        loop {
            if let Err(e) = self.run_cycle().await {
                error!(sync = %self.name, error = %e, "Search sync cycle failed");
            }
            tokio::time::sleep(interval).await;
        }
    }
}
