//! Input rows and output records for a batch.

use serde::{Deserialize, Serialize};

use super::status::{FetchStatus, Resolution};

/// One row of the paper table.
///
/// Column names follow the table's header. Missing columns and empty cells
/// both read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "Abstract", default)]
    pub abstract_text: String,

    #[serde(rename = "Title", default)]
    pub title: String,

    #[serde(rename = "ArticleURL", default)]
    pub article_url: String,

    #[serde(rename = "Year", default)]
    pub year: String,

    #[serde(rename = "Cites", default)]
    pub cites: String,

    #[serde(rename = "Authors", default)]
    pub authors: String,
}

/// A paper in a batch, augmented with its fetched abstract.
///
/// Field order is the order of keys in the batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRecord {
    /// 1-based position of the row in the table
    pub row_index: usize,

    pub title: String,

    pub url: String,

    pub year: String,

    pub citations: String,

    pub authors: String,

    /// Abstract as given in the table
    pub csv_abstract: String,

    /// Abstract fetched from the paper's page; `None` unless `fetch_status` is ok
    pub fetched_abstract: Option<String>,

    pub fetch_status: FetchStatus,
}

impl PaperRecord {
    /// Build the record for a table row from its resolution
    pub fn new(row_index: usize, row: SourceRow, resolution: Resolution) -> Self {
        let (fetched_abstract, fetch_status) = resolution.into_parts();
        Self {
            row_index,
            title: row.title,
            url: row.article_url,
            year: row.year,
            citations: row.cites,
            authors: row.authors,
            csv_abstract: row.abstract_text,
            fetched_abstract,
            fetch_status,
        }
    }

    /// Best available abstract: fetched, then the table's, if either is non-empty
    pub fn best_abstract(&self) -> Option<&str> {
        self.fetched_abstract
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.csv_abstract.as_str()).filter(|s| !s.is_empty()))
    }
}
