use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use cdc_dispatch::{has_interesting_change, ChangeEvent, ChangeHandler, FieldSet, HandlerResult};
use serde::Serialize;

/// Reacts to `Contact` changes that touch the fields it was configured with.
pub struct ContactChangeHandler {
    interest: FieldSet,
    summary: Arc<ContactSummary>,
}

impl ContactChangeHandler {
    pub const ENTITY: &'static str = "Contact";
    pub const DEFAULT_INTEREST: [&'static str; 4] = ["FirstName", "LastName", "Email", "Phone"];

    pub fn new(interest: FieldSet) -> Self {
        Self {
            interest,
            summary: Arc::default(),
        }
    }

    pub fn interest(&self) -> &FieldSet {
        &self.interest
    }

    /// Counters shared with the handler, readable after it has been registered.
    pub fn summary(&self) -> Arc<ContactSummary> {
        self.summary.clone()
    }

    fn update(&self, event: &ChangeEvent, gap: bool) -> HandlerResult {
        if gap {
            self.summary.gaps.fetch_add(1, Ordering::Relaxed);
        }

        if !has_interesting_change(Some(&event.changed_fields), &self.interest) {
            self.summary.ignored_updates.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(records = ?event.record_ids, "no interesting field changed");
            return Ok(());
        }

        self.summary.updated.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            gap,
            records = ?event.record_ids,
            fields = ?event.changed_fields.intersection(&self.interest),
            commit_user = ?event.header.commit_user,
            "contact updated"
        );
        Ok(())
    }

    fn gap(&self, event: &ChangeEvent) {
        self.summary.gaps.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            change_type = %event.change_type,
            records = ?event.record_ids,
            "change stream gap, record state should be re-read"
        );
    }
}

impl Default for ContactChangeHandler {
    fn default() -> Self {
        Self::new(FieldSet::new(Self::DEFAULT_INTEREST))
    }
}

impl ChangeHandler for ContactChangeHandler {
    async fn handle_create(&self, event: &ChangeEvent) -> HandlerResult {
        self.summary.created.fetch_add(1, Ordering::Relaxed);
        tracing::info!(records = ?event.record_ids, "contact created");
        Ok(())
    }

    async fn handle_update(&self, event: &ChangeEvent) -> HandlerResult {
        self.update(event, false)
    }

    async fn handle_delete(&self, event: &ChangeEvent) -> HandlerResult {
        self.summary.deleted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(records = ?event.record_ids, "contact deleted");
        Ok(())
    }

    async fn handle_undelete(&self, event: &ChangeEvent) -> HandlerResult {
        self.summary.undeleted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(records = ?event.record_ids, "contact restored");
        Ok(())
    }

    async fn handle_gap_create(&self, event: &ChangeEvent) -> HandlerResult {
        self.gap(event);
        self.summary.created.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn handle_gap_update(&self, event: &ChangeEvent) -> HandlerResult {
        tracing::warn!(records = ?event.record_ids, "update delivered after a gap");
        self.update(event, true)
    }

    async fn handle_gap_delete(&self, event: &ChangeEvent) -> HandlerResult {
        self.gap(event);
        self.summary.deleted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn handle_gap_undelete(&self, event: &ChangeEvent) -> HandlerResult {
        self.gap(event);
        self.summary.undeleted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn on_batch_complete(&self, records: &[ChangeEvent]) -> HandlerResult {
        self.summary.batches.fetch_add(1, Ordering::Relaxed);
        let counts = self.summary.counts();
        tracing::info!(
            records = records.len(),
            created = counts.created,
            updated = counts.updated,
            deleted = counts.deleted,
            undeleted = counts.undeleted,
            gaps = counts.gaps,
            "contact batch processed"
        );
        Ok(())
    }
}

/// Running totals across every batch a handler has seen.
#[derive(Debug, Default)]
pub struct ContactSummary {
    created: AtomicUsize,
    updated: AtomicUsize,
    ignored_updates: AtomicUsize,
    deleted: AtomicUsize,
    undeleted: AtomicUsize,
    gaps: AtomicUsize,
    batches: AtomicUsize,
}

impl ContactSummary {
    pub fn counts(&self) -> ContactCounts {
        ContactCounts {
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            ignored_updates: self.ignored_updates.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            undeleted: self.undeleted.load(Ordering::Relaxed),
            gaps: self.gaps.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactCounts {
    pub created: usize,
    /// Updates that touched at least one field of interest.
    pub updated: usize,
    pub ignored_updates: usize,
    pub deleted: usize,
    pub undeleted: usize,
    pub gaps: usize,
    pub batches: usize,
}
