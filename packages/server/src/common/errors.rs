use thiserror::Error;

use crate::domains::events::EventError;

/// Errors returned by user-facing actions (GraphQL mutations)
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
