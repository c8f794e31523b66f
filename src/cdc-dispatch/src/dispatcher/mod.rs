use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use handler::{ChangeHandler, HandlerResult};
use observer::{DispatchObserver, TracingObserver};

use crate::{
    error::DispatchError,
    event::{ChangeEvent, ChangeType, Operation},
};

pub mod handler;
pub mod observer;

/// Routes the events of one entity to its handler.
///
/// Events are dispatched one at a time in the order they are given. The only
/// state kept between calls is the number of events dispatched since the last
/// [`complete_batch`](Self::complete_batch); the caller decides where a batch
/// ends.
pub struct Dispatcher {
    entity: String,
    handler: Arc<dyn RouteHandler>,
    observer: Arc<dyn DispatchObserver>,
    pending: usize,
}

impl Dispatcher {
    pub fn new(entity: impl Into<String>, handler: impl ChangeHandler) -> Self {
        Self::from_shared(entity.into(), Arc::new(handler), Arc::new(TracingObserver))
    }

    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub(crate) fn from_shared(
        entity: String,
        handler: Arc<dyn RouteHandler>,
        observer: Arc<dyn DispatchObserver>,
    ) -> Self {
        Self {
            entity,
            handler,
            observer,
            pending: 0,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Events of this dispatcher's entity received since the last completed
    /// batch, including ones rejected as unknown or invalid.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Invokes the one handler callback matching the event's operation.
    ///
    /// Updates are always delivered, whatever fields they report.
    pub async fn dispatch(&mut self, event: &ChangeEvent) -> Result<(), DispatchError> {
        if event.entity_name == self.entity {
            self.pending += 1;
        }
        let result = self.route(event).await;
        if let Err(e) = &result {
            self.observer.failed(e);
        }
        result
    }

    /// Runs the handler's post-processing hook for the batch just dispatched.
    pub async fn complete_batch(&mut self, records: &[ChangeEvent]) -> Result<(), DispatchError> {
        self.pending = 0;

        let result = self
            .handler
            .complete(records)
            .await
            .map_err(|source| DispatchError::BatchCompletion {
                entity: self.entity.clone(),
                records: records.len(),
                source,
            });

        match &result {
            Ok(()) => self.observer.batch_completed(&self.entity, records.len()),
            Err(e) => self.observer.failed(e),
        }
        result
    }

    /// Dispatches a whole delivery batch, then completes it.
    ///
    /// A failing event never stops the events after it. The completion hook
    /// runs exactly once, empty batches included.
    pub async fn dispatch_batch(&mut self, batch: &[ChangeEvent]) -> BatchReport {
        let mut report = BatchReport::empty();
        for event in batch {
            report.attempted += 1;
            match self.dispatch(event).await {
                Ok(()) => report.succeeded += 1,
                Err(e) => report.failures.push(e),
            }
        }
        report.completion = self.complete_batch(batch).await;

        report
    }

    async fn route(&self, event: &ChangeEvent) -> Result<(), DispatchError> {
        if event.entity_name != self.entity {
            return Err(DispatchError::EntityMismatch {
                expected: self.entity.clone(),
                context: event.context(),
            });
        }

        let operation = match &event.change_type {
            ChangeType::Known(op) => *op,
            ChangeType::Unrecognized(raw) => {
                return Err(DispatchError::UnknownOperation {
                    context: event.context(),
                    change_type: raw.clone(),
                })
            }
        };

        event
            .validate()
            .map_err(|source| DispatchError::InvalidEvent {
                context: event.context(),
                source,
            })?;

        self.observer.dispatched(event, operation);
        self.handler
            .route(operation, event)
            .await
            .map_err(|source| DispatchError::Handler {
                context: event.context(),
                source,
            })
    }
}

/// Outcome of [`Dispatcher::dispatch_batch`].
#[derive(Debug)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    /// Per-event failures in delivery order.
    pub failures: Vec<DispatchError>,
    pub completion: Result<(), DispatchError>,
}

impl BatchReport {
    fn empty() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
            completion: Ok(()),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.completion.is_ok()
    }

    /// Every failure of the batch, the completion hook's last.
    pub fn into_errors(self) -> Vec<DispatchError> {
        let mut errors = self.failures;
        errors.extend(self.completion.err());
        errors
    }
}

/// Object-safe view of a [`ChangeHandler`], so handlers of different types
/// can sit behind one registry.
pub(crate) trait RouteHandler: Send + Sync {
    fn route<'a>(
        &'a self,
        operation: Operation,
        event: &'a ChangeEvent,
    ) -> BoxFuture<'a, HandlerResult>;

    fn complete<'a>(&'a self, records: &'a [ChangeEvent]) -> BoxFuture<'a, HandlerResult>;
}

impl<H: ChangeHandler> RouteHandler for H {
    fn route<'a>(
        &'a self,
        operation: Operation,
        event: &'a ChangeEvent,
    ) -> BoxFuture<'a, HandlerResult> {
        match operation {
            Operation::Create => self.handle_create(event).boxed(),
            Operation::Update => self.handle_update(event).boxed(),
            Operation::Delete => self.handle_delete(event).boxed(),
            Operation::Undelete => self.handle_undelete(event).boxed(),
            Operation::GapCreate => self.handle_gap_create(event).boxed(),
            Operation::GapUpdate => self.handle_gap_update(event).boxed(),
            Operation::GapDelete => self.handle_gap_delete(event).boxed(),
            Operation::GapUndelete => self.handle_gap_undelete(event).boxed(),
        }
    }

    fn complete<'a>(&'a self, records: &'a [ChangeEvent]) -> BoxFuture<'a, HandlerResult> {
        self.on_batch_complete(records).boxed()
    }
}
