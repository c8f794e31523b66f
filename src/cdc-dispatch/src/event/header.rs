use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordering and provenance metadata of the transaction that produced a change.
///
/// Opaque to the dispatcher; handlers receive it as delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHeader {
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub commit_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
}
