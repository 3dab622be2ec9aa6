use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Resume point of a sync: the last processed `(updated_at, id)` pair
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct SyncCursor {
    pub name: String,
    pub last_updated_at: DateTime<Utc>,
    pub last_id: Uuid,
}

impl SyncCursor {
    /// Epoch and nil id: everything is newer
    pub fn initial(name: &str) -> Self {
        Self {
            name: name.to_string(),
            last_updated_at: DateTime::<Utc>::UNIX_EPOCH,
            last_id: Uuid::nil(),
        }
    }

    /// Stored cursor, or the initial one for a first run
    pub async fn load(name: &str, pool: &PgPool) -> Result<Self> {
        let stored = sqlx::query_as::<_, Self>(
            "SELECT name, last_updated_at, last_id FROM search_sync_cursors WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(stored.unwrap_or_else(|| Self::initial(name)))
    }

    /// Persist the cursor if it is ahead of the stored one.
    ///
    /// Returns `false` when another runner already stored a position at or
    /// past this one; the stored cursor never moves backwards.
    pub async fn save(&self, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO search_sync_cursors (name, last_updated_at, last_id, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (name) DO UPDATE
             SET last_updated_at = EXCLUDED.last_updated_at,
                 last_id = EXCLUDED.last_id,
                 updated_at = NOW()
             WHERE (search_sync_cursors.last_updated_at, search_sync_cursors.last_id)
                 < (EXCLUDED.last_updated_at, EXCLUDED.last_id)",
        )
        .bind(&self.name)
        .bind(self.last_updated_at)
        .bind(self.last_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Forget the stored position so the next cycle reindexes everything
    pub async fn reset(name: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM search_sync_cursors WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub fn advance(&mut self, updated_at: DateTime<Utc>, id: Uuid) {
        self.last_updated_at = updated_at;
        self.last_id = id;
    }

    /// Same predicate the fetch query uses
    pub fn is_before(&self, updated_at: DateTime<Utc>, id: Uuid) -> bool {
        updated_at > self.last_updated_at || (updated_at == self.last_updated_at && id > self.last_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_initial_cursor_precedes_everything() {
        let cursor = SyncCursor::initial("recipes");
        let t = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(cursor.last_id, Uuid::nil());
        assert!(cursor.is_before(t, Uuid::now_v7()));
    }

    #[test]
    fn test_tie_on_updated_at_breaks_by_id() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let first = Uuid::from_u128(1);
        let second = Uuid::from_u128(2);

        let mut cursor = SyncCursor::initial("recipes");
        cursor.advance(t, first);

        assert_eq!(cursor.last_updated_at, t);
        assert_eq!(cursor.last_id, first);
        assert!(!cursor.is_before(t, first));
        assert!(cursor.is_before(t, second));
    }

    #[test]
    fn test_older_rows_are_not_refetched() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut cursor = SyncCursor::initial("recipes");
        cursor.advance(t, Uuid::from_u128(5));

        assert!(!cursor.is_before(t - chrono::Duration::seconds(1), Uuid::from_u128(9)));
        assert!(cursor.is_before(t + chrono::Duration::seconds(1), Uuid::from_u128(1)));
    }
}
