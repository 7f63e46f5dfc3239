//! Decoded API response envelopes.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Successful query result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse<T> {
    /// Server-side execution time in milliseconds.
    pub ms: u64,
    pub query: String,
    pub result: T,
}

/// A query the server rejected, with the offending span.
///
/// `start` and `end` are UTF-16 offsets into `query`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("{description}")]
pub struct QueryError {
    pub description: String,
    pub start: usize,
    pub end: usize,
    pub query: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl QueryError {
    /// The query with ` (here ->) ` replacing the error span.
    pub fn query_context(&self) -> String {
        let start = utf16_to_byte_offset(&self.query, self.start);
        let end = utf16_to_byte_offset(&self.query, self.end).max(start);
        format!("{} (here ->) {}", &self.query[..start], &self.query[end..])
    }
}

/// Byte offset of the char at a UTF-16 offset, clamped to the string.
fn utf16_to_byte_offset(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        if units >= offset {
            return byte;
        }
        units += ch.len_utf16();
    }
    s.len()
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryErrorEnvelope {
    pub error: QueryError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationOperation {
    Create,
    Delete,
    Update,
    None,
}

impl fmt::Display for MutationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationOperation::Create => "create",
            MutationOperation::Delete => "delete",
            MutationOperation::Update => "update",
            MutationOperation::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MutationResult {
    #[serde(default)]
    pub id: Option<String>,
    pub operation: MutationOperation,
}

/// Result of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub transaction_id: String,
    pub results: Vec<MutationResult>,
    #[serde(default)]
    pub document_ids: Option<Vec<String>>,
}

/// A transaction the server rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("{kind}: {description}")]
pub struct MutationErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MutationErrorEnvelope {
    pub error: MutationErrorBody,
}
