use std::{collections::HashSet, sync::Arc};

use serde::{Deserialize, Serialize};

/// An immutable set of field names.
///
/// Clones share the same underlying set, so a handler's interest set can be
/// handed to every dispatch call without copying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSet {
    fields: Arc<HashSet<String>>,
}

impl FieldSet {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Returns `true` if at least one field is present in both sets.
    pub fn intersects(&self, other: &FieldSet) -> bool {
        let (small, large) = self.by_size(other);
        small.iter().any(|field| large.contains(field))
    }

    /// Fields present in both sets, sorted.
    pub fn intersection<'a>(&'a self, other: &'a FieldSet) -> Vec<&'a str> {
        let (small, large) = self.by_size(other);
        let mut shared: Vec<&str> = small.iter().filter(|f| large.contains(f)).collect();
        shared.sort_unstable();
        shared
    }

    fn by_size<'a>(&'a self, other: &'a FieldSet) -> (&'a FieldSet, &'a FieldSet) {
        if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<Vec<String>> for FieldSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<FieldSet> for Vec<String> {
    fn from(value: FieldSet) -> Self {
        let mut fields: Vec<String> = value.fields.iter().cloned().collect();
        fields.sort_unstable();
        fields
    }
}

/// Decides whether a record mutation touched any field the caller cares about.
///
/// An absent or empty `changed` set is never interesting, and neither is
/// anything checked against an empty `interest` set.
pub fn has_interesting_change(changed: Option<&FieldSet>, interest: &FieldSet) -> bool {
    match changed {
        Some(changed) if !changed.is_empty() => changed.intersects(interest),
        _ => false,
    }
}
