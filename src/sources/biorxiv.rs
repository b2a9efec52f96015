//! bioRxiv/medRxiv content links.
//!
//! Both servers publish `.../content/<doi>v<n>.full.pdf` links that serve the
//! PDF, while the same path without the `.pdf` suffix serves the HTML landing
//! page with the abstract. This family only rewrites the URL; the landing page
//! itself goes through the generic whole-page rule.

use crate::sources::{Source, SourceCapabilities};

const PDF_SUFFIX: &str = ".pdf";

/// Server type for biorxiv/medrxiv
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerType {
    BioRxiv,
    MedRxiv,
}

impl ServerType {
    fn name(&self) -> &str {
        match self {
            ServerType::BioRxiv => "biorxiv",
            ServerType::MedRxiv => "medrxiv",
        }
    }

    fn display_name(&self) -> &str {
        match self {
            ServerType::BioRxiv => "bioRxiv",
            ServerType::MedRxiv => "medRxiv",
        }
    }

    fn content_marker(&self) -> &str {
        match self {
            ServerType::BioRxiv => "biorxiv.org/content/",
            ServerType::MedRxiv => "medrxiv.org/content/",
        }
    }
}

/// Shared implementation for bioRxiv/medRxiv
#[derive(Debug, Clone)]
struct BiorxivMedrxivSource {
    server_type: ServerType,
}

impl BiorxivMedrxivSource {
    fn new(server_type: ServerType) -> Self {
        Self { server_type }
    }

    fn matches(&self, url: &str) -> bool {
        url.contains(self.server_type.content_marker()) && url.ends_with(PDF_SUFFIX)
    }

    /// Cut the URL at the first `.pdf`, so `x.full.pdf` becomes `x.full`
    fn rewrite_url(&self, url: &str) -> Option<String> {
        if !self.matches(url) {
            return None;
        }
        url.split(PDF_SUFFIX).next().map(str::to_string)
    }
}

/// bioRxiv PDF links, rewritten to the abstract page
#[derive(Debug, Clone)]
pub struct BiorxivSource {
    inner: BiorxivMedrxivSource,
}

impl BiorxivSource {
    pub fn new() -> Self {
        Self {
            inner: BiorxivMedrxivSource::new(ServerType::BioRxiv),
        }
    }
}

impl Default for BiorxivSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for BiorxivSource {
    fn id(&self) -> &str {
        self.inner.server_type.name()
    }

    fn name(&self) -> &str {
        self.inner.server_type.display_name()
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::REWRITE_URL
    }

    fn matches(&self, url: &str) -> bool {
        self.inner.matches(url)
    }

    fn rewrite_url(&self, url: &str) -> Option<String> {
        self.inner.rewrite_url(url)
    }
}

/// medRxiv PDF links, rewritten to the abstract page
#[derive(Debug, Clone)]
pub struct MedrxivSource {
    inner: BiorxivMedrxivSource,
}

impl MedrxivSource {
    pub fn new() -> Self {
        Self {
            inner: BiorxivMedrxivSource::new(ServerType::MedRxiv),
        }
    }
}

impl Default for MedrxivSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for MedrxivSource {
    fn id(&self) -> &str {
        self.inner.server_type.name()
    }

    fn name(&self) -> &str {
        self.inner.server_type.display_name()
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::REWRITE_URL
    }

    fn matches(&self, url: &str) -> bool {
        self.inner.matches(url)
    }

    fn rewrite_url(&self, url: &str) -> Option<String> {
        self.inner.rewrite_url(url)
    }
}
