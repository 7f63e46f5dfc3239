//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
//!     Kind: image
//!     Id: Tb9Ew8CXIwaY6R1kjMvI0uRR
//!     Size: 2000x3000 (portrait)
//!     Format: jpg
//!     URL: https://cdn.sanity.io/images/zp7mbokg/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg
//! ```
//!
//! ## URLs
//!
//! The URL alone, or with `--verbose` its decoded query parameters:
//!
//! ```text
//! https://zp7mbokg.apicdn.sanity.io/v2021-03-25/data/query/production?query=*%5B_type+%3D%3D+%22movie%22%5D
//!     query: *[_type == "movie"]
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::asset::{AssetKind, AssetReference};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn shape(width: u32, height: u32) -> &'static str {
    match width.cmp(&height) {
        std::cmp::Ordering::Greater => "landscape",
        std::cmp::Ordering::Less => "portrait",
        std::cmp::Ordering::Equal => "square",
    }
}

// ============================================================================
// Inspect
// ============================================================================

/// Describe a parsed asset reference, with its delivery URL when it has one.
pub fn format_reference(raw: &str, reference: &AssetReference, url: Option<&str>) -> Vec<String> {
    let mut lines = vec![raw.to_string()];
    let pad = indent(1);

    match reference.kind() {
        AssetKind::Image => {
            lines.push(format!("{pad}Kind: image"));
            lines.push(format!("{pad}Id: {}", reference.id()));
            lines.push(format!(
                "{pad}Size: {}x{} ({})",
                reference.width(),
                reference.height(),
                shape(reference.width(), reference.height())
            ));
            lines.push(format!("{pad}Format: {}", reference.format()));
        }
        AssetKind::File => {
            lines.push(format!("{pad}Kind: file"));
            lines.push(format!("{pad}Id: {}", reference.id()));
            lines.push(format!("{pad}Extension: {}", reference.format()));
        }
        AssetKind::Unknown => {
            lines.push(format!("{pad}Kind: invalid reference"));
            return lines;
        }
    }

    if let Some(url) = url {
        lines.push(format!("{pad}URL: {url}"));
    }
    lines
}

pub fn print_reference(raw: &str, reference: &AssetReference, url: Option<&str>) {
    for line in format_reference(raw, reference, url) {
        println!("{}", line);
    }
}

// ============================================================================
// URLs
// ============================================================================

/// Format a URL, optionally followed by its decoded query parameters.
pub fn format_url(url: &str, verbose: bool) -> Vec<String> {
    let mut lines = vec![url.to_string()];
    if !verbose {
        return lines;
    }
    if let Ok(parsed) = url::Url::parse(url) {
        for (key, value) in parsed.query_pairs() {
            lines.push(format!("{}{key}: {value}", indent(1)));
        }
    }
    lines
}

pub fn print_url(url: &str, verbose: bool) {
    for line in format_url(url, verbose) {
        println!("{}", line);
    }
}
