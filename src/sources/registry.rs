//! Registry of source families, in priority order.

use std::borrow::Cow;
use std::sync::Arc;

#[cfg(feature = "source-arxiv")]
use super::ArxivSource;
#[cfg(feature = "source-biorxiv")]
use super::{BiorxivSource, MedrxivSource};
#[cfg(feature = "source-neurips")]
use super::NeuripsSource;
use super::Source;
use crate::utils::clean;

bitflags::bitflags! {
    /// Capabilities that a source can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        const EXTRACT = 1 << 0;
        const REWRITE_URL = 1 << 1;
    }
}

/// Ordered set of source families.
///
/// Unlike a map, registration order is significant: the first registered
/// source that matches a URL is the one applied.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a new registry with all built-in sources
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();

        #[cfg(feature = "source-arxiv")]
        registry.register(Arc::new(ArxivSource::new()));
        #[cfg(feature = "source-neurips")]
        registry.register(Arc::new(NeuripsSource::new()));
        #[cfg(feature = "source-biorxiv")]
        {
            registry.register(Arc::new(BiorxivSource::new()));
            registry.register(Arc::new(MedrxivSource::new()));
        }

        registry
    }

    /// Create a registry with no sources; every page falls back to whole-page text
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a source at the lowest priority.
    ///
    /// A source whose id is already registered replaces the old entry in place.
    pub fn register(&mut self, source: Arc<dyn Source>) {
        match self.sources.iter().position(|s| s.id() == source.id()) {
            Some(pos) => self.sources[pos] = source,
            None => self.sources.push(source),
        }
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Get all registered sources in priority order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    /// Get all source IDs in priority order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    /// Get sources that support a specific capability
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn Source>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// URL to actually request for `url`
    pub fn resolve_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        self.all()
            .filter(|s| s.supports_rewrite() && s.matches(url))
            .find_map(|s| s.rewrite_url(url))
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(url))
    }

    /// Extraction source responsible for `url`, if any
    pub fn classify(&self, url: &str) -> Option<&Arc<dyn Source>> {
        self.all().find(|s| s.supports_extract() && s.matches(url))
    }

    /// Span of `markup` believed to hold the abstract.
    ///
    /// Falls back to the whole page when no source matches or the matching
    /// source's rule finds nothing.
    pub fn fragment<'a>(&self, url: &str, markup: &'a str) -> &'a str {
        self.all()
            .filter(|s| s.supports_extract() && s.matches(url))
            .find_map(|s| {
                let fragment = s.extract(markup);
                if fragment.is_none() {
                    tracing::debug!(source = s.id(), url, "no abstract block, using whole page");
                }
                fragment
            })
            .unwrap_or(markup)
    }

    /// Abstract text for a fetched page: the fragment, normalized
    pub fn extract_abstract(&self, url: &str, markup: &str) -> String {
        clean(self.fragment(url, markup))
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
