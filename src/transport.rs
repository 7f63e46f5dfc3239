//! HTTP transport boundary.
//!
//! The [`Transport`] trait is the seam between request construction (this
//! crate) and the network (the caller's HTTP stack). It has two operations,
//! a `GET` and a JSON `POST`, both returning the raw status and body.
//!
//! No implementation ships with the crate. Wrap whichever HTTP client the
//! application already uses; [`Client`](crate::client::Client) handles
//! everything else.

use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Request failed: {0}")]
    Request(String),
}

/// Raw response as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

pub trait Transport: Sync {
    /// `GET url`.
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;

    /// `POST url` with a JSON body.
    fn post(&self, url: &Url, body: &[u8]) -> Result<HttpResponse, TransportError>;
}
