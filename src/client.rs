//! High-level client: URL construction, transport and decoding in one place.
//!
//! | Operation | Request | Success | Failure |
//! |---|---|---|---|
//! | [`Client::fetch`] | `GET` query URL | 2xx → [`QueryResponse`] | 400 → [`ClientError::Query`], else [`ClientError::Status`] |
//! | [`Client::mutate`] | `POST` mutate URL | 2xx → [`MutationResponse`] | 4xx → [`ClientError::Mutation`], else [`ClientError::Status`] |
//! | [`Client::image_url`] | none | [`ImageUrlBuilder`] | |
//! | [`Client::file_url`] | none | delivery URL | `None` for non-file references |

use crate::api::{self, ApiError, ListenOptions, MutateOptions, QueryParams};
use crate::config::{CdnEndpoint, ClientConfig, ConfigError};
use crate::imaging::{self, ImageUrlBuilder};
use crate::mutation::{MutationError, Transaction};
use crate::response::{
    MutationErrorBody, MutationErrorEnvelope, MutationResponse, QueryError, QueryErrorEnvelope,
    QueryResponse,
};
use crate::transport::{HttpResponse, Transport, TransportError};
use crate::types::{File, Image};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Could not encode transaction: {0}")]
    Encode(#[from] MutationError),
    #[error("Query error: {0}")]
    Query(QueryError),
    #[error("Mutation rejected: {0}")]
    Mutation(MutationErrorBody),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn unexpected(response: &HttpResponse) -> ClientError {
    ClientError::Status {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}

pub struct Client<T: Transport> {
    config: ClientConfig,
    endpoint: CdnEndpoint,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Fails when `config` does not validate.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        let endpoint = config.cdn_endpoint()?;
        Ok(Self {
            config,
            endpoint,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a query and decode its `result` as `R`.
    pub fn fetch<R: DeserializeOwned>(
        &self,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryResponse<R>, ClientError> {
        let url = api::query_url(&self.config, query, params)?;
        log::debug!("GET {url}");
        let response = self.transport.get(&url)?;

        if response.is_success() {
            return Ok(serde_json::from_slice(&response.body)?);
        }
        if response.status == 400 {
            if let Ok(envelope) = serde_json::from_slice::<QueryErrorEnvelope>(&response.body) {
                return Err(ClientError::Query(envelope.error));
            }
        }
        Err(unexpected(&response))
    }

    /// Commit a transaction.
    pub fn mutate(
        &self,
        transaction: &Transaction,
        options: &MutateOptions,
    ) -> Result<MutationResponse, ClientError> {
        let body = serde_json::to_vec(&transaction.body()?)?;
        let url = api::mutate_url(&self.config, options)?;
        log::debug!(
            "POST {url} ({} mutations)",
            transaction.mutations().len()
        );
        let response = self.transport.post(&url, &body)?;

        if response.is_success() {
            return Ok(serde_json::from_slice(&response.body)?);
        }
        if response.is_client_error() {
            let envelope: MutationErrorEnvelope = serde_json::from_slice(&response.body)?;
            return Err(ClientError::Mutation(envelope.error));
        }
        Err(unexpected(&response))
    }

    /// Event-stream URL for the caller's SSE connection.
    pub fn listen_url(
        &self,
        query: &str,
        params: &QueryParams,
        options: &ListenOptions,
    ) -> Result<Url, ClientError> {
        Ok(api::listen_url(&self.config, query, params, options)?)
    }

    pub fn image_url(&self, image: &Image) -> ImageUrlBuilder {
        ImageUrlBuilder::new(self.endpoint.clone(), image)
    }

    pub fn file_url(&self, file: &File) -> Option<String> {
        imaging::file_url(&self.endpoint, &file.asset_reference())
    }
}
