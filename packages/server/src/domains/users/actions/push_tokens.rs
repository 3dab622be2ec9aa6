use sqlx::PgPool;
use tracing::info;

use crate::common::{ActionError, UserId};
use crate::domains::users::PushSubscription;

const EXPO_TOKEN_PREFIXES: [&str; 2] = ["ExponentPushToken[", "ExpoPushToken["];

fn is_expo_token(token: &str) -> bool {
    EXPO_TOKEN_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) && token.ends_with(']')
}

pub async fn register_push_token(
    user_id: UserId,
    token: &str,
    pool: &PgPool,
) -> Result<PushSubscription, ActionError> {
    let token = token.trim();
    if !is_expo_token(token) {
        return Err(ActionError::InvalidInput("not an Expo push token".to_string()));
    }

    let subscription = PushSubscription::upsert(user_id, token, pool).await?;
    info!(user_id = %user_id, "Registered push token");
    Ok(subscription)
}

pub async fn unregister_push_token(
    user_id: UserId,
    token: &str,
    pool: &PgPool,
) -> Result<bool, ActionError> {
    Ok(PushSubscription::delete_for_user(user_id, token.trim(), pool).await?)
}
