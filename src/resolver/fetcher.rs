//! Single-shot page retrieval.

use std::sync::Arc;

use crate::config::FetchConfig;
use crate::models::{FetchFailure, TransportKind};
use crate::sources::SourceRegistry;
use crate::utils::{media_type, read_capped, HttpClient};

/// Media type that short-circuits text extraction
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A page as returned by the server, truncated to the fetch limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL actually requested, after any source rewrite
    pub url: String,

    /// Declared media type, lower-cased, without parameters
    pub content_type: String,

    /// Raw body prefix
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_MEDIA_TYPE
    }
}

/// Page or failure; never both
pub type FetchResult = Result<FetchedPage, FetchFailure>;

/// Fetches paper pages: one GET per call, bounded in time and size, no retries
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    registry: Arc<SourceRegistry>,
    max_bytes: usize,
}

impl Fetcher {
    pub fn new(client: HttpClient, registry: Arc<SourceRegistry>, max_bytes: usize) -> Self {
        Self {
            client,
            registry,
            max_bytes,
        }
    }

    /// Build a fetcher with its own client from fetch settings
    pub fn from_config(
        config: &FetchConfig,
        registry: Arc<SourceRegistry>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            HttpClient::from_config(config)?,
            registry,
            config.max_bytes,
        ))
    }

    /// Fetch `url`.
    ///
    /// An empty URL fails with [`FetchFailure::MissingUrl`] without any request.
    /// Source rewrites (e.g. bioRxiv PDF links) are applied first.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let target = self.registry.resolve_url(url.trim());
        if target.is_empty() {
            return Err(FetchFailure::MissingUrl);
        }
        if target != url {
            tracing::debug!(from = url, to = %target, "rewrote URL");
        }

        let response = self
            .client
            .client()
            .get(&*target)
            .send()
            .await
            .map_err(|e| transport_failure(&target, &e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchFailure::Http(status.as_u16()));
        }

        let content_type = media_type(&response);
        let body = read_capped(response, self.max_bytes)
            .await
            .map_err(|e| transport_failure(&target, &e))?;

        tracing::trace!(url = %target, %content_type, bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            url: target.into_owned(),
            content_type,
            body,
        })
    }
}

fn transport_failure(url: &str, err: &reqwest::Error) -> FetchFailure {
    let kind = TransportKind::from(err);
    tracing::debug!(url, error = %err, kind = kind.name(), "request failed");
    FetchFailure::Transport(kind)
}
