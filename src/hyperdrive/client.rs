//! Hyperdrive Client
//!
//! The transport seam used by the view models, and its reqwest-backed
//! implementation.

use super::error::HyperdriveError;
use super::http::{expand_uri, request_body, HyperdriveHttpClient};
use super::representor::{Representor, Transition, TransitionInput};
use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// Turns a URI or a transition into a `Representor`.
///
/// One transport is shared by every view model of a session, so
/// implementations must be usable from many owners at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the resource at `uri`
    async fn request_uri(&self, uri: &str) -> Result<Representor, HyperdriveError>;

    /// Execute `transition` with the given input
    async fn request(
        &self,
        transition: &Transition,
        input: &TransitionInput,
    ) -> Result<Representor, HyperdriveError>;
}

/// Main hypermedia client
#[derive(Clone)]
pub struct Hyperdrive {
    pub http: HyperdriveHttpClient,
}

impl Hyperdrive {
    /// Create a client with no extra headers
    pub fn new() -> Result<Self> {
        Self::with_headers(&[])
    }

    /// Create a client sending `headers` (e.g. `Authorization`) on every request
    pub fn with_headers(headers: &[(String, String)]) -> Result<Self> {
        let http = HyperdriveHttpClient::new(headers)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for Hyperdrive {
    async fn request_uri(&self, uri: &str) -> Result<Representor, HyperdriveError> {
        let url = Url::parse(uri).map_err(|e| HyperdriveError::InvalidUri(format!("{}: {}", uri, e)))?;
        self.http.send("GET", url, None).await
    }

    async fn request(
        &self,
        transition: &Transition,
        input: &TransitionInput,
    ) -> Result<Representor, HyperdriveError> {
        let url = expand_uri(transition, input)?;
        let body = request_body(transition, input);
        self.http
            .send(&transition.method, url, body.as_ref())
            .await
    }
}
