use chrono::{DateTime, Utc};
use juniper::GraphQLObject;
use uuid::Uuid;

use super::ActivityLog;

/// Feed entry
#[derive(Debug, Clone, GraphQLObject)]
pub struct ActivityData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityData {
    fn from(a: ActivityLog) -> Self {
        Self {
            id: a.id.into_uuid(),
            user_id: a.user_id.into_uuid(),
            activity_type: a.activity_type,
            target_type: a.target_type,
            target_id: a.target_id,
            metadata: a.metadata.map(|m| m.to_string()),
            created_at: a.created_at,
        }
    }
}
