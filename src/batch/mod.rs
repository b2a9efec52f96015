//! Batch windowing and record assembly.
//!
//! A batch is a fixed-size, contiguous window of the paper table addressed by
//! a 1-based index: batch `n` covers rows `(n-1)*size + 1 ..= n*size`. Windows
//! never overlap, so reviewers can work on different batches independently,
//! and re-running a batch always covers the same rows.

mod output;

pub use output::{batch_file_name, render_text, write_json, NO_ABSTRACT, RULE_WIDTH, WRAP_WIDTH};

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::models::{PaperRecord, Resolution, SourceRow};
use crate::resolver::AbstractResolver;

/// Batch-level failures. Per-record fetch failures never show up here.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch index must be >= 1")]
    InvalidIndex,

    #[error("batch size must be >= 1")]
    InvalidSize,

    #[error("paper table not found at {}", .0.display())]
    InputMissing(PathBuf),

    #[error("failed to read paper table: {0}")]
    Csv(#[from] csv::Error),

    #[error("No records found for the requested batch.")]
    EmptyBatch { batch: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize batch: {0}")]
    Json(#[from] serde_json::Error),
}

/// A 1-based batch index together with the batch size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWindow {
    index: usize,
    size: usize,
}

impl BatchWindow {
    pub fn new(index: usize, size: usize) -> Result<Self, BatchError> {
        if index == 0 {
            return Err(BatchError::InvalidIndex);
        }
        if size == 0 {
            return Err(BatchError::InvalidSize);
        }
        Ok(Self { index, size })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Zero-based row positions covered by this batch
    pub fn positions(&self) -> Range<usize> {
        let start = (self.index - 1).saturating_mul(self.size);
        start..start.saturating_add(self.size)
    }

    /// 1-based row indices covered by this batch
    pub fn row_indices(&self) -> Range<usize> {
        let positions = self.positions();
        positions.start + 1..positions.end + 1
    }

    /// The following batch
    pub fn next(&self) -> Self {
        Self {
            index: self.index + 1,
            size: self.size,
        }
    }
}

/// Read the rows of `window` from the CSV at `path`.
///
/// Returns `(row_index, row)` pairs with 1-based indices. Cells are trimmed;
/// missing columns read as empty. Rows past the window are never parsed.
pub fn read_rows(path: &Path, window: BatchWindow) -> Result<Vec<(usize, SourceRow)>, BatchError> {
    if !path.is_file() {
        return Err(BatchError::InputMissing(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let positions = window.positions();
    let mut rows = Vec::with_capacity(window.size());
    for (pos, record) in reader.records().enumerate() {
        if pos < positions.start {
            continue;
        }
        if pos >= positions.end {
            break;
        }
        let row: SourceRow = record?.deserialize(Some(&headers))?;
        rows.push((pos + 1, row));
    }

    tracing::debug!(
        batch = window.index(),
        rows = rows.len(),
        path = %path.display(),
        "read batch rows"
    );
    Ok(rows)
}

/// Builds the records of a batch: table rows plus fetched abstracts
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    resolver: AbstractResolver,
    input: PathBuf,
}

impl BatchAssembler {
    pub fn new(resolver: AbstractResolver, input: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            input: input.into(),
        }
    }

    /// Rows in `window`, without fetching anything.
    ///
    /// An empty window is an error.
    pub fn rows(&self, window: BatchWindow) -> Result<Vec<(usize, SourceRow)>, BatchError> {
        let rows = read_rows(&self.input, window)?;
        if rows.is_empty() {
            return Err(BatchError::EmptyBatch {
                batch: window.index(),
            });
        }
        Ok(rows)
    }

    /// Read and assemble the batch, resolving each row's abstract
    pub async fn assemble<F>(
        &self,
        window: BatchWindow,
        on_resolved: F,
    ) -> Result<Vec<PaperRecord>, BatchError>
    where
        F: FnMut(&Resolution),
    {
        let rows = self.rows(window)?;
        Ok(self.resolve_rows(rows, on_resolved).await)
    }

    /// Resolve the abstract of each row and build its record.
    ///
    /// `on_resolved` is called after each row's resolution. Individual fetch
    /// failures are recorded in the records, never returned.
    pub async fn resolve_rows<F>(
        &self,
        rows: Vec<(usize, SourceRow)>,
        on_resolved: F,
    ) -> Vec<PaperRecord>
    where
        F: FnMut(&Resolution),
    {
        tracing::info!(rows = rows.len(), "resolving abstracts");

        let urls: Vec<String> = rows.iter().map(|(_, row)| row.article_url.clone()).collect();
        let resolutions = self.resolver.resolve_all(&urls, on_resolved).await;

        let records: Vec<PaperRecord> = rows
            .into_iter()
            .zip(resolutions)
            .map(|((row_index, row), resolution)| PaperRecord::new(row_index, row, resolution))
            .collect();

        let failed = records.iter().filter(|r| !r.fetch_status.is_ok()).count();
        tracing::info!(records = records.len(), failed, "batch assembled");
        records
    }
}
