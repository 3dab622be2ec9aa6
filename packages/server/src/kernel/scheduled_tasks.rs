//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (SEARCH_SYNC_CRON, default every 5 minutes)
//!     │
//!     └─► SearchSync::run_cycle()
//!             └─► changed recipes → bulk upsert/delete → cursor saved
//! ```
//!
//! The standalone `search_sync` binary runs the same cycle; both share the
//! persisted cursor.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::SearchConfig;
use crate::domains::search::SearchSync;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: &ServerDeps, search: &SearchConfig) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sync = Arc::new(SearchSync::new(deps, search.batch_size));
    // a slow cycle must not overlap with the next tick
    let running = Arc::new(Mutex::new(()));

    let sync_job = Job::new_async(search.sync_cron.as_str(), move |_uuid, _lock| {
        let sync = sync.clone();
        let running = running.clone();
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::debug!("Search sync still running, skipping tick");
                return;
            };
            if let Err(e) = sync.run_cycle().await {
                tracing::error!("Scheduled search sync failed: {}", e);
            }
        })
    })?;

    scheduler.add(sync_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (search sync: {})", search.sync_cron);
    Ok(scheduler)
}
