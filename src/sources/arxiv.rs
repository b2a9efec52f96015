//! arXiv abstract pages.

use regex::Regex;
use std::sync::LazyLock;

use crate::sources::Source;

/// URL fragment identifying an arXiv abstract page
const ARXIV_ABS_MARKER: &str = "arxiv.org/abs/";

/// Abstract block: after the "Abstract:" descriptor, up to the closing blockquote
static ABSTRACT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span class="descriptor">Abstract:</span>(.*?)</blockquote>"#)
        .expect("valid regex")
});

/// arXiv abstract pages (`https://arxiv.org/abs/<id>`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ArxivSource;

impl ArxivSource {
    pub fn new() -> Self {
        Self
    }
}

impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    fn matches(&self, url: &str) -> bool {
        url.contains(ARXIV_ABS_MARKER)
    }

    fn extract<'a>(&self, markup: &'a str) -> Option<&'a str> {
        ABSTRACT_BLOCK
            .captures(markup)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
