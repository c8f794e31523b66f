use thiserror::Error;

use crate::event::{EventContext, Operation};

/// Failures reported for a single event or for a batch's completion hook.
///
/// None of these abort a batch; the caller decides whether to retry or skip.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown operation '{change_type}' for {context}")]
    UnknownOperation {
        context: EventContext,
        change_type: String,
    },

    #[error("handler failed for {context}")]
    Handler {
        context: EventContext,
        #[source]
        source: anyhow::Error,
    },

    #[error("batch completion failed for {entity} ({records} records)")]
    BatchCompletion {
        entity: String,
        records: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid event {context}")]
    InvalidEvent {
        context: EventContext,
        #[source]
        source: EventError,
    },

    #[error("dispatcher for {expected} received {context}")]
    EntityMismatch {
        expected: String,
        context: EventContext,
    },
}

impl DispatchError {
    pub fn context(&self) -> Option<&EventContext> {
        match self {
            DispatchError::UnknownOperation { context, .. }
            | DispatchError::Handler { context, .. }
            | DispatchError::InvalidEvent { context, .. }
            | DispatchError::EntityMismatch { context, .. } => Some(context),
            DispatchError::BatchCompletion { .. } => None,
        }
    }

    /// Only handler-side failures can succeed on redelivery.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DispatchError::Handler { .. } | DispatchError::BatchCompletion { .. }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("event carries no record ids")]
    NoRecordIds,

    #[error("changed fields reported for {operation}")]
    UnexpectedChangedFields { operation: Operation },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a handler is already registered for {0}")]
    Duplicate(String),
}
