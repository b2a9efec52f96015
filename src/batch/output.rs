//! Batch output: the JSON batch file and the terminal rendering.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::BatchError;
use crate::models::PaperRecord;

/// Placeholder shown when a record has neither a fetched nor a table abstract
pub const NO_ABSTRACT: &str = "<no abstract>";

/// Column at which abstracts are wrapped in the terminal rendering
pub const WRAP_WIDTH: usize = 100;

/// Width of the separator line between records
pub const RULE_WIDTH: usize = 60;

/// File name for batch `index`, e.g. `batch_007.json`
pub fn batch_file_name(index: usize) -> String {
    format!("batch_{:03}.json", index)
}

/// Write `records` as a pretty-printed JSON array to `<dir>/batch_NNN.json`.
///
/// Creates `dir` if needed and returns the path written.
pub fn write_json(records: &[PaperRecord], dir: &Path, index: usize) -> Result<PathBuf, BatchError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(batch_file_name(index));

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), records = records.len(), "wrote batch file");
    Ok(path)
}

/// Human-readable rendering: header line, wrapped abstract, separator
pub fn render_text(records: &[PaperRecord]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{:04}: {} [{}]\n",
            record.row_index, record.title, record.fetch_status
        ));
        out.push_str(&textwrap::fill(
            record.best_abstract().unwrap_or(NO_ABSTRACT),
            WRAP_WIDTH,
        ));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
    }
    out
}
