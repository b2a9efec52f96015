//! NeurIPS proceedings pages.

use regex::Regex;
use std::sync::LazyLock;

use crate::sources::Source;

const NEURIPS_HOST: &str = "proceedings.neurips.cc";

/// First paragraph after the "Abstract" heading
static ABSTRACT_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Abstract\s*</h4>\s*<p>(.*?)</p>").expect("valid regex")
});

/// NeurIPS proceedings paper pages (`https://proceedings.neurips.cc/paper/...`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuripsSource;

impl NeuripsSource {
    pub fn new() -> Self {
        Self
    }
}

impl Source for NeuripsSource {
    fn id(&self) -> &str {
        "neurips"
    }

    fn name(&self) -> &str {
        "NeurIPS Proceedings"
    }

    fn matches(&self, url: &str) -> bool {
        url.contains(NEURIPS_HOST)
    }

    fn extract<'a>(&self, markup: &'a str) -> Option<&'a str> {
        ABSTRACT_PARAGRAPH
            .captures(markup)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
