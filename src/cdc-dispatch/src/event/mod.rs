use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::EventError, fields::FieldSet};

mod change_type;
mod header;

pub use change_type::{ChangeType, Operation};
pub use header::CommitHeader;

/// One inbound change record, already classified by the subscription layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub change_type: ChangeType,
    pub entity_name: String,
    pub record_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "FieldSet::is_empty")]
    pub changed_fields: FieldSet,
    #[serde(flatten)]
    pub header: CommitHeader,
}

impl ChangeEvent {
    pub fn new<I, S>(
        change_type: impl Into<ChangeType>,
        entity_name: impl Into<String>,
        record_ids: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            change_type: change_type.into(),
            entity_name: entity_name.into(),
            record_ids: record_ids.into_iter().map(Into::into).collect(),
            changed_fields: FieldSet::empty(),
            header: CommitHeader::default(),
        }
    }

    pub fn with_changed_fields(mut self, changed_fields: FieldSet) -> Self {
        self.changed_fields = changed_fields;
        self
    }

    pub fn with_header(mut self, header: CommitHeader) -> Self {
        self.header = header;
        self
    }

    pub fn operation(&self) -> Option<Operation> {
        self.change_type.operation()
    }

    /// Checks the structural invariants of a recognized event.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.record_ids.is_empty() {
            return Err(EventError::NoRecordIds);
        }
        if let Some(op) = self.operation() {
            if !op.carries_changed_fields() && !self.changed_fields.is_empty() {
                return Err(EventError::UnexpectedChangedFields { operation: op });
            }
        }
        Ok(())
    }

    pub fn context(&self) -> EventContext {
        EventContext {
            entity_name: self.entity_name.clone(),
            record_ids: self.record_ids.clone(),
            change_type: self.change_type.clone(),
        }
    }
}

/// Identifies an event in error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub entity_name: String,
    pub record_ids: Vec<String>,
    pub change_type: ChangeType,
}

impl fmt::Display for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.entity_name,
            self.change_type,
            self.record_ids.join(", ")
        )
    }
}
