//! Notification actions - reading, marking as read and preference updates

use sqlx::PgPool;
use tracing::info;

use super::data::{
    NotificationConnection, NotificationData, NotificationPreferencesData,
    NotificationPreferencesInput,
};
use super::{Notification, NotificationPreferences};
use crate::common::{
    build_page_info, trim_results, ActionError, NotificationId, UserId, ValidatedPaginationArgs,
};
use crate::domains::users::Profile;

pub async fn list_notifications(
    user_id: UserId,
    args: &ValidatedPaginationArgs,
    pool: &PgPool,
) -> Result<NotificationConnection, ActionError> {
    let rows = Notification::find_for_user_paginated(user_id, args, pool).await?;
    let (rows, has_more) = trim_results(rows, args.limit);
    let last_id = rows.last().map(|n| n.id.into_uuid());

    Ok(NotificationConnection {
        nodes: rows.into_iter().map(NotificationData::from).collect(),
        page_info: build_page_info(has_more, last_id),
    })
}

pub async fn mark_notification_read(
    user_id: UserId,
    notification_id: NotificationId,
    pool: &PgPool,
) -> Result<Notification, ActionError> {
    Notification::mark_read(notification_id, user_id, pool)
        .await?
        .ok_or(ActionError::NotFound("Notification"))
}

pub async fn mark_all_notifications_read(user_id: UserId, pool: &PgPool) -> Result<u64, ActionError> {
    let updated = Notification::mark_all_read(user_id, pool).await?;
    info!(user_id = %user_id, updated, "Marked notifications read");
    Ok(updated)
}

pub async fn get_notification_preferences(
    user_id: UserId,
    pool: &PgPool,
) -> Result<NotificationPreferences, ActionError> {
    let profile = Profile::find_by_user_id(user_id, pool)
        .await?
        .ok_or(ActionError::NotFound("Profile"))?;
    Ok(profile.notification_preferences.0)
}

pub async fn update_notification_preferences(
    user_id: UserId,
    input: NotificationPreferencesInput,
    pool: &PgPool,
) -> Result<NotificationPreferencesData, ActionError> {
    let changes = input.into_changes();
    if changes.is_empty() {
        return Err(ActionError::InvalidInput(
            "at least one preference must be set".to_string(),
        ));
    }

    let profile = Profile::update_notification_preferences(user_id, &changes, pool).await?;
    info!(user_id = %user_id, "Updated notification preferences");
    Ok(NotificationPreferencesData::from(&profile.notification_preferences.0))
}
