//! Abstract resolution: fetch a paper's page and pull its abstract out.
//!
//! [`AbstractResolver::resolve`] turns a URL into a [`Resolution`]:
//!
//! - fetch failure → its status, no text
//! - declared PDF → `error:pdf-content`, no text, no extraction attempted
//! - anything else → body decoded as UTF-8 (invalid bytes dropped), the
//!   matching source rule applied, the fragment cleaned, status `ok`
//!
//! A page whose rule finds nothing still resolves `ok` with the cleaned
//! whole-page text; the status does not distinguish the two.

mod fetcher;

pub use fetcher::{FetchResult, FetchedPage, Fetcher, PDF_MEDIA_TYPE};

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::config::FetchConfig;
use crate::models::{FetchFailure, Resolution};
use crate::sources::SourceRegistry;

/// Fetcher + source rules + normalizer
#[derive(Debug, Clone)]
pub struct AbstractResolver {
    fetcher: Fetcher,
    registry: Arc<SourceRegistry>,
    concurrency: usize,
}

impl AbstractResolver {
    /// Create a resolver that fetches one page at a time
    pub fn new(fetcher: Fetcher, registry: Arc<SourceRegistry>) -> Self {
        Self {
            fetcher,
            registry,
            concurrency: 1,
        }
    }

    /// Create a resolver with the built-in sources from fetch settings
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let registry = Arc::new(SourceRegistry::new());
        let fetcher = Fetcher::from_config(config, Arc::clone(&registry))?;
        Ok(Self::new(fetcher, registry).with_concurrency(config.concurrency))
    }

    /// Allow up to `concurrency` fetches in flight in [`resolve_all`](Self::resolve_all)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Resolve the abstract for one URL
    pub async fn resolve(&self, url: &str) -> Resolution {
        let resolution = match self.fetcher.fetch(url).await {
            Err(failure) => Resolution::failed(failure),
            Ok(page) if page.is_pdf() => Resolution::failed(FetchFailure::PdfContent),
            Ok(page) => {
                let markup = decode_utf8_dropping_invalid(&page.body);
                Resolution::ok(self.registry.extract_abstract(&page.url, &markup))
            }
        };

        match resolution.status() {
            status if status.is_ok() => tracing::debug!(url, %status, "resolved abstract"),
            status => tracing::info!(url, %status, "no abstract"),
        }
        resolution
    }

    /// Resolve many URLs; results are in input order whatever the concurrency.
    ///
    /// `on_resolved` is called once per URL as results arrive, in input order.
    pub async fn resolve_all<F>(&self, urls: &[String], mut on_resolved: F) -> Vec<Resolution>
    where
        F: FnMut(&Resolution),
    {
        stream::iter(urls)
            .map(|url| self.resolve(url))
            .buffered(self.concurrency)
            .inspect(|resolution| on_resolved(resolution))
            .collect()
            .await
    }
}

/// Decode bytes as UTF-8, silently dropping invalid sequences
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
