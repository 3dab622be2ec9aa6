use thiserror::Error;

use crate::common::UserId;

/// Failures of the event dispatcher
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Actor not found: {0}")]
    ActorNotFound(UserId),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl EventError {
    /// Stable machine-readable code for API callers
    pub fn code(&self) -> &'static str {
        match self {
            EventError::ActorNotFound(_) => "ACTOR_NOT_FOUND",
            EventError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
