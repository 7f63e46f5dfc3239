//! Shared test utilities for the content-lake test suite.
//!
//! Provides fixture references, config/endpoint constructors, and small
//! lookup helpers for decoded JSON.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = image(TALL_REF, Some(crop(0.1, 0.1, 0.0, 0.0)), None);
//! let url = ImageUrlBuilder::new(test_endpoint(), &img).width(30).build();
//! ```

use crate::config::{CdnEndpoint, ClientConfig};
use crate::types::{Crop, Hotspot, Image, Reference};

// =========================================================================
// Fixture references
// =========================================================================

/// 2000x3000 portrait JPEG.
pub const TALL_REF: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";

/// 3000x2000 landscape JPEG.
pub const WIDE_REF: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-3000x2000-jpg";

/// 1000x1200 PNG.
pub const PORTRAIT_PNG_REF: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-1000x1200-png";

/// Missing the `image-` prefix and the dimensions separator.
pub const INVALID_REF: &str = "Tb9Ew8CXIwaY6R1kjMvI0uRR000x3000-jpg";

pub const FILE_REF: &str = "file-e3a1c57b0ef7f4b2e2c2e2a1a8c93d19a1bd2d1e-pdf";

// =========================================================================
// Constructors
// =========================================================================

/// Project `zp7mbokg`, dataset `production`, stock hosts.
pub fn test_config() -> ClientConfig {
    ClientConfig::new("zp7mbokg", "production")
}

pub fn test_endpoint() -> CdnEndpoint {
    test_config()
        .cdn_endpoint()
        .unwrap_or_else(|e| panic!("test config must validate: {e}"))
}

pub fn crop(top: f64, bottom: f64, left: f64, right: f64) -> Crop {
    Crop::new(top, bottom, left, right)
}

pub fn hotspot(x: f64, y: f64, width: f64, height: f64) -> Hotspot {
    Hotspot::new(x, y, width, height)
}

pub fn image(asset_ref: &str, crop: Option<Crop>, hotspot: Option<Hotspot>) -> Image {
    Image::new(Reference::new(asset_ref), crop, hotspot)
}

// =========================================================================
// JSON lookups, panics with a clear message on miss
// =========================================================================

/// Parse a URL's query string into ordered `(key, value)` pairs.
pub fn query_pairs(url: &str) -> Vec<(String, String)> {
    let parsed = url::Url::parse(url).unwrap_or_else(|e| panic!("invalid URL '{url}': {e}"));
    parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Value of a query parameter. Panics if not present.
pub fn query_param(url: &str, key: &str) -> String {
    let pairs = query_pairs(url);
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| {
            let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
            panic!("query param '{key}' not found in {url}. Available: {keys:?}")
        })
}

/// The single mutation in a `{"mutations": [...]}` body. Panics otherwise.
pub fn only_mutation(body: &serde_json::Value) -> &serde_json::Value {
    let mutations = body["mutations"]
        .as_array()
        .unwrap_or_else(|| panic!("body has no mutations array: {body}"));
    assert_eq!(mutations.len(), 1, "expected one mutation in {body}");
    &mutations[0]
}
