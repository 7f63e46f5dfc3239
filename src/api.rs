//! API endpoint URLs for queries, listeners and mutations.
//!
//! | Endpoint | Path | Host |
//! |---|---|---|
//! | Query | `/data/query/{dataset}` | API CDN when `use_cdn`, otherwise live |
//! | Listen | `/data/listen/{dataset}` | always live |
//! | Mutate | `/data/mutate/{dataset}` | always live |
//!
//! Every path is prefixed with the configured API version. Query strings
//! are form-encoded. Caller params are an ordered map from name to JSON
//! value: strings are sent as-is, anything else as its JSON text.

use crate::config::ClientConfig;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Named query parameters, emitted in key order.
pub type QueryParams = BTreeMap<String, Value>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// When a mutation's effects become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Sync,
    Async,
    Deferred,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Sync => "sync",
            Visibility::Async => "async",
            Visibility::Deferred => "deferred",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra switches for a listen request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Include the document as it looked before each change.
    pub include_previous_revision: Option<bool>,
    /// `transaction` (default on the server) or `query`.
    pub visibility: Option<String>,
}

/// Switches for a mutation commit. Unset switches are left to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutateOptions {
    pub return_ids: Option<bool>,
    pub return_documents: Option<bool>,
    pub visibility: Option<Visibility>,
    pub dry_run: Option<bool>,
}

/// `{project_id}.{api_cdn}` or `{project_id}.{api}`.
pub fn api_host(config: &ClientConfig, use_cdn: bool) -> String {
    let host = if use_cdn {
        &config.hosts.api_cdn
    } else {
        &config.hosts.api
    };
    format!("{}.{}", config.project_id, host)
}

/// Versioned API URL for `path`, on the host selected by `config.use_cdn`.
pub fn api_url(config: &ClientConfig, path: &str) -> Result<Url, ApiError> {
    versioned_url(config, config.use_cdn, path)
}

/// `GET` URL for a query.
pub fn query_url(
    config: &ClientConfig,
    query: &str,
    params: &QueryParams,
) -> Result<Url, ApiError> {
    let path = format!("/data/query/{}", config.dataset);
    let url = versioned_url(config, config.use_cdn, &path)?;

    let mut pairs = vec![("query".to_string(), query.to_string())];
    if let Some(perspective) = &config.perspective {
        pairs.push(("perspective".to_string(), perspective.to_string()));
    }
    merge_params(&mut pairs, params);
    Ok(with_query(url, &pairs))
}

/// Event-stream URL for listening to changes matching `query`.
///
/// `includeResult=true` is sent unless a param of the same name overrides it.
pub fn listen_url(
    config: &ClientConfig,
    query: &str,
    params: &QueryParams,
    options: &ListenOptions,
) -> Result<Url, ApiError> {
    let path = format!("/data/listen/{}", config.dataset);
    let url = versioned_url(config, false, &path)?;

    let mut pairs = vec![
        ("query".to_string(), query.to_string()),
        ("includeResult".to_string(), "true".to_string()),
    ];
    if let Some(include) = options.include_previous_revision {
        pairs.push(("includePreviousRevision".to_string(), include.to_string()));
    }
    if let Some(visibility) = &options.visibility {
        pairs.push(("visibility".to_string(), visibility.clone()));
    }
    merge_params(&mut pairs, params);
    Ok(with_query(url, &pairs))
}

/// `POST` URL for committing a transaction.
pub fn mutate_url(config: &ClientConfig, options: &MutateOptions) -> Result<Url, ApiError> {
    let path = format!("/data/mutate/{}", config.dataset);
    let url = versioned_url(config, false, &path)?;

    let mut pairs = Vec::new();
    if let Some(v) = options.return_ids {
        pairs.push(("returnIds".to_string(), v.to_string()));
    }
    if let Some(v) = options.return_documents {
        pairs.push(("returnDocuments".to_string(), v.to_string()));
    }
    if let Some(v) = options.visibility {
        pairs.push(("visibility".to_string(), v.to_string()));
    }
    if let Some(v) = options.dry_run {
        pairs.push(("dryRun".to_string(), v.to_string()));
    }
    Ok(with_query(url, &pairs))
}

/// Render a param value: strings raw, everything else as JSON text.
pub fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn versioned_url(config: &ClientConfig, use_cdn: bool, path: &str) -> Result<Url, ApiError> {
    let raw = format!(
        "https://{}/{}{}",
        api_host(config, use_cdn),
        config.api_version,
        path
    );
    Ok(Url::parse(&raw)?)
}

/// Caller params replace defaults of the same name in place; new names append.
fn merge_params(pairs: &mut Vec<(String, String)>, params: &QueryParams) {
    for (name, value) in params {
        let value = param_value(value);
        match pairs.iter_mut().find(|(existing, _)| existing == name) {
            Some(pair) => pair.1 = value,
            None => pairs.push((name.clone(), value)),
        }
    }
}

fn with_query(mut url: Url, pairs: &[(String, String)]) -> Url {
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
    }
    url
}
