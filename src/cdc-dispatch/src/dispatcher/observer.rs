use std::error::Error as _;

use crate::{
    error::DispatchError,
    event::{ChangeEvent, Operation},
};

/// Receives a notification for every routing decision a dispatcher makes.
pub trait DispatchObserver: Send + Sync {
    fn dispatched(&self, _event: &ChangeEvent, _operation: Operation) {}

    fn failed(&self, _error: &DispatchError) {}

    fn batch_completed(&self, _entity: &str, _records: usize) {}
}

/// Logs dispatch activity through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn dispatched(&self, event: &ChangeEvent, operation: Operation) {
        tracing::debug!(
            entity = %event.entity_name,
            change_type = %operation,
            records = ?event.record_ids,
            sequence_number = ?event.header.sequence_number,
            "dispatching"
        );
    }

    fn failed(&self, error: &DispatchError) {
        match error.source() {
            Some(cause) => tracing::warn!(
                error = %error,
                cause = %cause,
                retryable = error.is_retryable(),
                "dispatch failed"
            ),
            None => tracing::warn!(
                error = %error,
                retryable = error.is_retryable(),
                "dispatch failed"
            ),
        }
    }

    fn batch_completed(&self, entity: &str, records: usize) {
        tracing::info!(entity, records, "batch complete");
    }
}
