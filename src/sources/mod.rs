//! Source-family rules for locating an abstract in a paper's landing page.
//!
//! Each publisher family is a [`Source`]: a URL predicate plus whatever the
//! family needs, an extraction rule (the span of raw markup holding the
//! abstract) or a URL rewrite applied before fetching. Families are kept in
//! a [`SourceRegistry`] and tried in registration order; the first match
//! wins. When no family matches, or the matching family's rule finds
//! nothing, the whole page is used.
//!
//! Matching is on fixed substrings of the URL, never on page content.
//!
//! # Feature Flags
//!
//! - `source-arxiv` - arXiv abstract pages (default: enabled)
//! - `source-neurips` - NeurIPS proceedings pages (default: enabled)
//! - `source-biorxiv` - bioRxiv/medRxiv PDF link rewrite (default: enabled)

#[cfg(feature = "source-arxiv")]
mod arxiv;
#[cfg(feature = "source-biorxiv")]
mod biorxiv;
#[cfg(feature = "source-neurips")]
mod neurips;
mod registry;

#[cfg(feature = "source-arxiv")]
pub use arxiv::ArxivSource;
#[cfg(feature = "source-biorxiv")]
pub use biorxiv::{BiorxivSource, MedrxivSource};
#[cfg(feature = "source-neurips")]
pub use neurips::NeuripsSource;

pub use registry::{SourceCapabilities, SourceRegistry};

/// A publisher family recognized by URL.
///
/// # Implementing a New Source
///
/// 1. Create a struct implementing `Source`
/// 2. Implement `id`, `name` and `matches`
/// 3. Implement `extract` and/or `rewrite_url` and declare them in `capabilities`
/// 4. Register it in `SourceRegistry::new()`; position sets priority
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Describe the capabilities of this source
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::EXTRACT
    }

    /// Whether this source supports abstract extraction
    fn supports_extract(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::EXTRACT)
    }

    /// Whether this source rewrites URLs before fetching
    fn supports_rewrite(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::REWRITE_URL)
    }

    /// Whether `url` belongs to this family
    fn matches(&self, url: &str) -> bool;

    /// Span of raw markup holding the abstract, if the page has one
    fn extract<'a>(&self, _markup: &'a str) -> Option<&'a str> {
        None
    }

    /// URL to fetch instead of `url`, if this family needs one
    fn rewrite_url(&self, _url: &str) -> Option<String> {
        None
    }
}
