use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of record operations a handler can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Undelete,
    GapCreate,
    GapUpdate,
    GapDelete,
    GapUndelete,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Undelete,
        Operation::GapCreate,
        Operation::GapUpdate,
        Operation::GapDelete,
        Operation::GapUndelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Undelete => "UNDELETE",
            Operation::GapCreate => "GAP_CREATE",
            Operation::GapUpdate => "GAP_UPDATE",
            Operation::GapDelete => "GAP_DELETE",
            Operation::GapUndelete => "GAP_UNDELETE",
        }
    }

    /// Gap operations were delivered after the stream lost track of events.
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            Operation::GapCreate
                | Operation::GapUpdate
                | Operation::GapDelete
                | Operation::GapUndelete
        )
    }

    /// The plain operation a gap operation stands for.
    pub fn base(&self) -> Operation {
        match self {
            Operation::GapCreate => Operation::Create,
            Operation::GapUpdate => Operation::Update,
            Operation::GapDelete => Operation::Delete,
            Operation::GapUndelete => Operation::Undelete,
            other => *other,
        }
    }

    /// Only updates report which fields changed.
    pub fn carries_changed_fields(&self) -> bool {
        self.base() == Operation::Update
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Accepts the platform spelling (`GAP_UPDATE`) and the variant name
    /// (`GapUpdate`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Operation::ALL
            .into_iter()
            .find(|op| normalize(op.as_str()) == wanted)
            .ok_or_else(|| s.to_string())
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// The change type carried by an inbound event.
///
/// Raw values are matched as by [`Operation::from_str`]. Anything else is kept
/// verbatim so the dispatcher can report it instead of the decoder dropping
/// the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeType {
    Known(Operation),
    Unrecognized(String),
}

impl ChangeType {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ChangeType::Known(op) => Some(*op),
            ChangeType::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeType::Known(op) => op.as_str(),
            ChangeType::Unrecognized(raw) => raw,
        }
    }
}

impl From<Operation> for ChangeType {
    fn from(value: Operation) -> Self {
        ChangeType::Known(value)
    }
}

impl From<&str> for ChangeType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(op) => ChangeType::Known(op),
            Err(raw) => ChangeType::Unrecognized(raw),
        }
    }
}

impl From<String> for ChangeType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(op) => ChangeType::Known(op),
            Err(_) => ChangeType::Unrecognized(value),
        }
    }
}

impl From<ChangeType> for String {
    fn from(value: ChangeType) -> Self {
        match value {
            ChangeType::Known(op) => op.as_str().to_string(),
            ChangeType::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
