//! Client configuration.
//!
//! Handles loading, validating, and merging `content-lake.toml`. Values are
//! layered: stock defaults, then the config file, then command-line
//! overrides. Each layer only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! project_id = "zp7mbokg"      # Required
//! dataset = "production"
//! api_version = "v2021-03-25"  # "v1", "X", or "vYYYY-MM-DD"
//! use_cdn = true               # Serve queries from the API CDN
//! perspective = "published"    # Optional: raw, drafts, published, or a comma list
//!
//! [hosts]
//! api = "api.sanity.io"
//! api_cdn = "apicdn.sanity.io"
//! cdn = "cdn.sanity.io"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! A [`ClientConfig`] is a plain value. Builders and clients receive it
//! explicitly, so several projects can be addressed side by side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILENAME: &str = "content-lake.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which document view queries read.
///
/// `raw`, `drafts` and `published` are the named perspectives; several can
/// be layered with [`Perspective::layers`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Perspective(String);

impl Perspective {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn raw() -> Self {
        Self::new("raw")
    }

    pub fn drafts() -> Self {
        Self::new("drafts")
    }

    pub fn published() -> Self {
        Self::new("published")
    }

    /// Stack perspectives, earliest taking precedence: `"a,b"`.
    pub fn layers<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Perspective>,
    {
        let joined: Vec<String> = layers.into_iter().map(|p| p.0).collect();
        Self(joined.join(","))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Perspective {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hosts the client talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostsConfig {
    /// Live API host; prefixed with the project id.
    pub api: String,
    /// Cached API host for queries; prefixed with the project id.
    pub api_cdn: String,
    /// Asset delivery host, independent of the API hosts.
    pub cdn: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            api: "api.sanity.io".to_string(),
            api_cdn: "apicdn.sanity.io".to_string(),
            cdn: "cdn.sanity.io".to_string(),
        }
    }
}

/// Client configuration loaded from `content-lake.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub project_id: String,
    pub dataset: String,
    /// API version path segment, e.g. `v2021-03-25`.
    pub api_version: String,
    /// Read queries through the API CDN.
    pub use_cdn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,
    pub hosts: HostsConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "v2021-03-25".to_string(),
            use_cdn: true,
            perspective: None,
            hosts: HostsConfig::default(),
        }
    }
}

/// Where asset URLs point: delivery host plus project and dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnEndpoint {
    pub host: String,
    pub project_id: String,
    pub dataset: String,
}

impl ClientConfig {
    /// Config for a project and dataset with every other value at its default.
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_use_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = Some(perspective);
        self
    }

    /// Asset delivery endpoint. Validates first, since project id and
    /// dataset become unescaped URL path segments.
    pub fn cdn_endpoint(&self) -> Result<CdnEndpoint, ConfigError> {
        self.validate()?;
        Ok(CdnEndpoint {
            host: self.hosts.cdn.clone(),
            project_id: self.project_id.clone(),
            dataset: self.dataset.clone(),
        })
    }

    /// Validate identifiers and the API version.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::Validation("project_id is required".into()));
        }
        if !self
            .project_id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(ConfigError::Validation(
                "project_id may only contain a-z, 0-9 and dashes".into(),
            ));
        }
        if self.dataset.is_empty() || self.dataset.len() > 64 {
            return Err(ConfigError::Validation(
                "dataset must be 1-64 characters".into(),
            ));
        }
        if !self
            .dataset
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(ConfigError::Validation(
                "dataset may only contain a-z, 0-9, underscores and dashes".into(),
            ));
        }
        if !is_api_version(&self.api_version) {
            return Err(ConfigError::Validation(format!(
                "api_version {:?} must be v1, X, or vYYYY-MM-DD",
                self.api_version
            )));
        }
        for (key, host) in [
            ("hosts.api", &self.hosts.api),
            ("hosts.api_cdn", &self.hosts.api_cdn),
            ("hosts.cdn", &self.hosts.cdn),
        ] {
            if host.is_empty() || host.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a bare host name"
                )));
            }
        }
        Ok(())
    }
}

fn is_api_version(version: &str) -> bool {
    if version == "v1" || version == "X" {
        return true;
    }
    let Some(date) = version.strip_prefix('v') else {
        return false;
    };
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    // ClientConfig holds only strings, bools and tables, all representable
    toml::Value::try_from(ClientConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `content-lake.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ClientConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ClientConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `content-lake.toml` in `dir`, applying `overrides` last.
pub fn load_config(
    dir: &Path,
    overrides: Option<toml::Value>,
) -> Result<ClientConfig, ConfigError> {
    let base = stock_defaults_value();
    let file = load_raw_config(dir)?;
    resolve_config(base, file.into_iter().chain(overrides))
}

/// Returns a fully-commented stock `content-lake.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# content-lake configuration
# ==========================
# Values shown are the defaults, except project_id which has none.
# Command-line flags (--project-id, --dataset) override this file.
# Unknown keys will cause an error.

# Project to address. Required.
project_id = "your-project-id"

# Dataset within the project.
dataset = "production"

# API version path segment: "v1", "X" (experimental), or a date "vYYYY-MM-DD".
api_version = "v2021-03-25"

# Read queries through the cached API host. Listen and mutate requests
# always use the live API host.
use_cdn = true

# Document perspective for queries: "raw", "drafts", "published", or a
# comma-separated stack. Omit to use the server default.
# perspective = "published"

# ---------------------------------------------------------------------------
# Hosts
# ---------------------------------------------------------------------------
[hosts]
# Live API host, prefixed with the project id.
api = "api.sanity.io"

# Cached API host, prefixed with the project id.
api_cdn = "apicdn.sanity.io"

# Asset delivery host for image and file URLs.
cdn = "cdn.sanity.io"
"##
}
