use std::future::{ready, Future, Ready};

use crate::event::ChangeEvent;

pub type HandlerResult = anyhow::Result<()>;

/// Entity-specific reactions to change events.
///
/// Each operation has its own callback. Callbacks that are not overridden
/// log the event and succeed.
pub trait ChangeHandler: Send + Sync + 'static {
    fn handle_create(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_create", event)
    }

    /// Receives every update, interesting or not. Use
    /// [`has_interesting_change`](crate::fields::has_interesting_change) to
    /// decide whether the changed fields matter.
    fn handle_update(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_update", event)
    }

    fn handle_delete(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_delete", event)
    }

    fn handle_undelete(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_undelete", event)
    }

    fn handle_gap_create(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_gap_create", event)
    }

    fn handle_gap_update(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_gap_update", event)
    }

    fn handle_gap_delete(&self, event: &ChangeEvent) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_gap_delete", event)
    }

    fn handle_gap_undelete(
        &self,
        event: &ChangeEvent,
    ) -> impl Future<Output = HandlerResult> + Send {
        unhandled("handle_gap_undelete", event)
    }

    /// Runs once after every event of a batch has been dispatched.
    fn on_batch_complete(
        &self,
        records: &[ChangeEvent],
    ) -> impl Future<Output = HandlerResult> + Send {
        tracing::debug!(records = records.len(), "no batch completion logic");
        ready(Ok(()))
    }
}

fn unhandled(callback: &'static str, event: &ChangeEvent) -> Ready<HandlerResult> {
    tracing::debug!(
        callback,
        entity = %event.entity_name,
        change_type = %event.change_type,
        records = ?event.record_ids,
        "no handler logic"
    );
    ready(Ok(()))
}
