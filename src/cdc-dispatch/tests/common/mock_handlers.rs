use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex,
    },
};

use cdc_dispatch::{
    has_interesting_change, ChangeEvent, ChangeHandler, CommitHeader, DispatchError,
    DispatchObserver, FieldSet, HandlerResult, Operation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callback: &'static str,
    pub record_ids: Vec<String>,
    /// Outcome of the field-interest check, for update callbacks only.
    pub interesting: Option<bool>,
    pub header: CommitHeader,
}

impl Call {
    pub fn new(callback: &'static str, record_ids: &[&str]) -> Self {
        Self {
            callback,
            record_ids: record_ids.iter().map(|id| id.to_string()).collect(),
            interesting: None,
            header: CommitHeader::default(),
        }
    }

    pub fn update(callback: &'static str, record_ids: &[&str], interesting: bool) -> Self {
        Self {
            interesting: Some(interesting),
            ..Self::new(callback, record_ids)
        }
    }
}

/// Records every callback it receives and fails on request.
pub struct RecordingHandler {
    pub interest: FieldSet,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub attempts: Arc<AtomicU32>,
    pub fail_on: HashSet<String>,
    pub fail_completion: bool,
}

impl RecordingHandler {
    pub fn new(interest: FieldSet) -> Self {
        Self {
            interest,
            calls: Arc::default(),
            attempts: Arc::default(),
            fail_on: HashSet::new(),
            fail_completion: false,
        }
    }

    pub fn failing_on(mut self, record_id: &str) -> Self {
        self.fail_on.insert(record_id.to_string());
        self
    }

    pub fn failing_completion(mut self) -> Self {
        self.fail_completion = true;
        self
    }

    fn record(&self, callback: &'static str, event: &ChangeEvent) -> HandlerResult {
        let prev = self.attempts.fetch_add(1, Ordering::Relaxed);

        let interesting = event
            .operation()
            .filter(Operation::carries_changed_fields)
            .map(|_| has_interesting_change(Some(&event.changed_fields), &self.interest));
        self.calls.lock().unwrap().push(Call {
            callback,
            record_ids: event.record_ids.clone(),
            interesting,
            header: event.header.clone(),
        });

        if event.record_ids.iter().any(|id| self.fail_on.contains(id)) {
            anyhow::bail!("Failed on attempt {}", prev);
        }
        Ok(())
    }
}

impl ChangeHandler for RecordingHandler {
    async fn handle_create(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_create", event)
    }

    async fn handle_update(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_update", event)
    }

    async fn handle_delete(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_delete", event)
    }

    async fn handle_undelete(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_undelete", event)
    }

    async fn handle_gap_create(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_gap_create", event)
    }

    async fn handle_gap_update(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_gap_update", event)
    }

    async fn handle_gap_delete(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_gap_delete", event)
    }

    async fn handle_gap_undelete(&self, event: &ChangeEvent) -> HandlerResult {
        self.record("handle_gap_undelete", event)
    }

    async fn on_batch_complete(&self, records: &[ChangeEvent]) -> HandlerResult {
        let record_ids = records
            .iter()
            .flat_map(|event| event.record_ids.iter().cloned())
            .collect();
        self.calls.lock().unwrap().push(Call {
            callback: "on_batch_complete",
            record_ids,
            interesting: None,
            header: CommitHeader::default(),
        });

        anyhow::ensure!(!self.fail_completion, "summary write failed");
        Ok(())
    }
}

/// Overrides nothing.
pub struct PlaceholderHandler;

impl ChangeHandler for PlaceholderHandler {}

#[derive(Default)]
pub struct RecordingObserver {
    pub notes: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().unwrap().clone()
    }
}

impl DispatchObserver for RecordingObserver {
    fn dispatched(&self, event: &ChangeEvent, operation: Operation) {
        self.notes
            .lock()
            .unwrap()
            .push(format!("dispatched {operation} {}", event.record_ids.join(",")));
    }

    fn failed(&self, error: &DispatchError) {
        self.notes.lock().unwrap().push(format!("failed {error}"));
    }

    fn batch_completed(&self, entity: &str, records: usize) {
        self.notes
            .lock()
            .unwrap()
            .push(format!("completed {entity} {records}"));
    }
}
