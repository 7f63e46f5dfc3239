//! # Content Lake
//!
//! A client library for a hosted content repository: build queries, encode
//! mutations, decode listen streams, and derive delivery URLs for stored
//! assets.
//!
//! # Architecture: Pure Construction, External Transport
//!
//! Everything in this crate is request construction and response decoding.
//! The network sits behind the [`transport::Transport`] trait, so the crate
//! never opens a socket:
//!
//! ```text
//! ClientConfig ─┬─ api::query_url / listen_url / mutate_url ─→ Transport ─→ response / listen
//!               └─ ImageUrlBuilder / file_url ─→ CDN URL string (no request at all)
//! ```
//!
//! The hardest piece is the image URL engine. Given an asset reference plus
//! optional crop and hotspot metadata and a requested output size, it computes
//! the source rectangle the CDN should cut, without ever downloading pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`asset`] | Parses `image-<id>-<W>x<H>-<fmt>` and `file-<id>-<ext>` references |
//! | [`types`] | Document values: `Reference`, `Crop`, `Hotspot`, `Image`, `File`, `Slug` |
//! | [`imaging`] | Source-rect geometry, transform options, image and file URLs |
//! | [`config`] | `content-lake.toml` loading, merging, and validation |
//! | [`api`] | Query, listen, and mutate endpoint URLs |
//! | [`mutation`] | Mutations, patches, and the transaction body |
//! | [`response`] | Query and mutation response envelopes |
//! | [`listen`] | SSE parsing and listen-event decoding |
//! | [`transport`] | The HTTP boundary as a trait |
//! | [`client`] | Ties config, URLs, transport, and decoding together |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Builders Are Values
//!
//! [`imaging::ImageUrlBuilder`] setters consume and return the builder. Two
//! renditions derived from one base never share state, and building the
//! same chain twice yields the same URL.
//!
//! ## Invalid Input Never Panics
//!
//! Asset references come from document content, so a malformed one parses
//! to an invalid [`asset::AssetReference`] and URL building returns `None`.
//! [`imaging::ImageUrlBuilder::try_build`] reports the reason when needed.
//!
//! ## Explicit Configuration
//!
//! There is no global client. A [`config::ClientConfig`] is passed to every
//! builder and client, so several projects can be addressed from one process.

pub mod api;
pub mod asset;
pub mod client;
pub mod config;
pub mod imaging;
pub mod listen;
pub mod mutation;
pub mod output;
pub mod response;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
