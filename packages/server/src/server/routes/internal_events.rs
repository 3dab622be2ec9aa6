//! Internal event endpoint - lets the frontend fire events for actions it owns
//! (registration, activation, comments, ...).
//!
//! Authenticated with a shared secret in the `x-internal-secret` header.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::common::UserId;
use crate::domains::activity::ActivityLog;
use crate::domains::events::{
    fire_event, AppEvent, EventError, EventName, FireEvent, UnknownEventName,
};
use crate::domains::notifications::Notification;
use crate::server::app::AppState;

pub const INTERNAL_SECRET_HEADER: &str = "x-internal-secret";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireEventRequest {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    pub actor_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub metadata: Option<Value>,
    #[serde(default)]
    pub revalidate_paths: Vec<String>,
    pub track_properties: Option<Value>,
    #[serde(default)]
    pub skip_activity: bool,
}

#[derive(Debug, Serialize)]
pub struct FireEventResponse {
    pub activity: Option<ActivityLog>,
    pub notification: Option<Notification>,
}

/// Errors of the internal route, rendered as `{ error, code }`
#[derive(Debug, Error)]
pub enum InternalApiError {
    #[error("Invalid internal secret")]
    Unauthorized,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    UnknownEvent(#[from] UnknownEventName),

    #[error("{0}")]
    InvalidEventData(String),

    #[error(transparent)]
    Event(#[from] EventError),
}

impl InternalApiError {
    pub fn code(&self) -> &'static str {
        match self {
            InternalApiError::Unauthorized => "UNAUTHORIZED",
            InternalApiError::InvalidRequest(_) => "INVALID_REQUEST",
            InternalApiError::UnknownEvent(_) => "UNKNOWN_EVENT",
            InternalApiError::InvalidEventData(_) => "INVALID_EVENT_DATA",
            InternalApiError::Event(e) => e.code(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            InternalApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            InternalApiError::InvalidRequest(_)
            | InternalApiError::UnknownEvent(_)
            | InternalApiError::InvalidEventData(_) => StatusCode::BAD_REQUEST,
            InternalApiError::Event(EventError::ActorNotFound(_)) => StatusCode::NOT_FOUND,
            InternalApiError::Event(EventError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InternalApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Internal event failed");
        }

        (
            status,
            Json(json!({ "error": self.to_string(), "code": self.code() })),
        )
            .into_response()
    }
}

/// Compare without short-circuiting on the first differing byte
fn secrets_match(provided: &[u8], expected: &[u8]) -> bool {
    // an unset secret never authenticates
    if expected.is_empty() || provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// POST /internal/events
pub async fn fire_event_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FireEventResponse>, InternalApiError> {
    let provided = headers
        .get(INTERNAL_SECRET_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();
    if !secrets_match(provided, state.internal_api_secret.as_bytes()) {
        warn!("Rejected internal event request with invalid secret");
        return Err(InternalApiError::Unauthorized);
    }

    // parsed only after the secret check so unauthenticated callers learn nothing
    let request: FireEventRequest = serde_json::from_slice(&body)
        .map_err(|e| InternalApiError::InvalidRequest(e.to_string()))?;

    let name: EventName = request.event.parse()?;
    let event = AppEvent::from_parts(name, request.data)
        .map_err(|e| InternalApiError::InvalidEventData(e.to_string()))?;

    let input = FireEvent {
        event,
        actor_id: UserId::from_uuid(request.actor_id),
        recipient_id: request.recipient_id.map(UserId::from_uuid),
        metadata: request.metadata,
        revalidate_paths: request.revalidate_paths,
        track_properties: request.track_properties,
        skip_activity: request.skip_activity,
        skip_tracking: false,
    };

    let result = fire_event(input, &state.server_deps).await?;

    Ok(Json(FireEventResponse {
        activity: result.activity,
        notification: result.notification,
    }))
}
