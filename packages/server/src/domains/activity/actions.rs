use sqlx::PgPool;

use super::data::ActivityData;
use super::ActivityLog;
use crate::common::{ActionError, UserId};

const DEFAULT_FEED_LIMIT: i32 = 30;
const MAX_FEED_LIMIT: i32 = 100;

/// Newest-first feed of the user's and their followees' activity
pub async fn get_activity_feed(
    user_id: UserId,
    limit: Option<i32>,
    pool: &PgPool,
) -> Result<Vec<ActivityData>, ActionError> {
    let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT);
    let rows = ActivityLog::find_feed_for_user(user_id, i64::from(limit), pool).await?;
    Ok(rows.into_iter().map(ActivityData::from).collect())
}
