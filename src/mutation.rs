//! Mutations and the transaction body sent to the mutate endpoint.
//!
//! A [`Transaction`] is an ordered list of [`Mutation`]s. Its body is
//! `{"mutations": [...]}`, one entry per document mutation and one
//! `{"patch": {...}}` entry per patch operation.

use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("{operation} requires a JSON object document, got {found}")]
    NotAnObject {
        operation: &'static str,
        found: &'static str,
    },
}

/// Where inserted items go relative to the path's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    Before,
    #[default]
    After,
}

impl InsertPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            InsertPosition::Before => "before",
            InsertPosition::After => "after",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    Set(Value),
    Unset,
    SetIfMissing(Value),
    Insert(Value, InsertPosition),
    /// Replace the items matched by the path.
    Replace(Value),
    Inc(i64),
    Dec(i64),
    DiffMatchPatch(String),
}

/// One operation applied at a document path.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub path: String,
    pub operation: PatchOperation,
}

impl Patch {
    pub fn new(path: impl Into<String>, operation: PatchOperation) -> Self {
        Self {
            path: path.into(),
            operation,
        }
    }

    fn encode(&self, id: &str, if_revision_id: Option<&str>) -> Value {
        let path = self.path.clone();
        let (key, body) = match &self.operation {
            PatchOperation::Set(value) => ("set", json!({ path: value })),
            PatchOperation::Unset => ("unset", json!([path])),
            PatchOperation::SetIfMissing(value) => ("setIfMissing", json!({ path: value })),
            PatchOperation::Insert(items, position) => (
                "insert",
                json!({ position.as_str(): path, "items": items }),
            ),
            PatchOperation::Replace(items) => {
                ("insert", json!({ "replace": path, "items": items }))
            }
            PatchOperation::Inc(amount) => ("inc", json!({ path: amount })),
            PatchOperation::Dec(amount) => ("dec", json!({ path: amount })),
            PatchOperation::DiffMatchPatch(text) => ("diffMatchPatch", json!({ path: text })),
        };

        let mut patch = Map::new();
        patch.insert("id".to_string(), Value::String(id.to_string()));
        if let Some(rev) = if_revision_id {
            patch.insert("ifRevisionID".to_string(), Value::String(rev.to_string()));
        }
        patch.insert(key.to_string(), body);
        json!({ "patch": patch })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(Value),
    CreateIfNotExists(Value),
    CreateOrReplace(Value),
    Patch {
        id: String,
        patches: Vec<Patch>,
        /// Apply only if the document is still at this revision.
        if_revision_id: Option<String>,
    },
    Delete {
        id: String,
    },
}

impl Mutation {
    pub fn patch(id: impl Into<String>, patches: Vec<Patch>) -> Self {
        Mutation::Patch {
            id: id.into(),
            patches,
            if_revision_id: None,
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Mutation::Delete { id: id.into() }
    }

    /// Entries this mutation contributes to the `mutations` array.
    pub fn encode(&self) -> Result<Vec<Value>, MutationError> {
        match self {
            Mutation::Create(doc) => document_entry("create", doc),
            Mutation::CreateIfNotExists(doc) => document_entry("createIfNotExists", doc),
            Mutation::CreateOrReplace(doc) => document_entry("createOrReplace", doc),
            Mutation::Delete { id } => Ok(vec![json!({ "delete": { "id": id } })]),
            Mutation::Patch {
                id,
                patches,
                if_revision_id,
            } => Ok(patches
                .iter()
                .map(|p| p.encode(id, if_revision_id.as_deref()))
                .collect()),
        }
    }
}

fn document_entry(operation: &'static str, doc: &Value) -> Result<Vec<Value>, MutationError> {
    if !doc.is_object() {
        return Err(MutationError::NotAnObject {
            operation,
            found: json_kind(doc),
        });
    }
    let mut entry = Map::new();
    entry.insert(operation.to_string(), doc.clone());
    Ok(vec![Value::Object(entry)])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Ordered mutations committed atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    mutations: Vec<Mutation>,
}

impl Transaction {
    pub fn new(mutations: Vec<Mutation>) -> Self {
        Self { mutations }
    }

    pub fn push(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn body(&self) -> Result<Value, MutationError> {
        let mut entries = Vec::new();
        for mutation in &self.mutations {
            entries.extend(mutation.encode()?);
        }
        Ok(json!({ "mutations": entries }))
    }
}
