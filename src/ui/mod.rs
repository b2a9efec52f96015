//! Terminal progress display for batch runs.

use std::io::IsTerminal;

use crate::models::Resolution;

/// Check if stderr (where progress is drawn) is a terminal.
pub fn is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Progress bar over the records of a batch.
///
/// A hidden bar is used when progress is disabled, so callers never branch.
pub struct BatchProgress {
    pb: indicatif::ProgressBar,
}

impl BatchProgress {
    /// Create a progress bar for `len` records
    pub fn new(len: u64, batch: usize, enabled: bool) -> Self {
        let pb = if enabled {
            indicatif::ProgressBar::new(len)
        } else {
            indicatif::ProgressBar::hidden()
        };
        if let Ok(style) = indicatif::ProgressStyle::with_template(
            "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%)",
        ) {
            pb.set_style(style.progress_chars("█▓▒░ "));
        }
        pb.set_message(format!("Batch {}", batch));

        Self { pb }
    }

    /// Count one resolved record
    pub fn record(&self, resolution: &Resolution) {
        if !resolution.status().is_ok() {
            self.pb.set_message(format!("last: {}", resolution.status()));
        }
        self.pb.inc(1);
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.finish_with_message(format!("✓ {}", msg));
    }

    /// Remove the bar from the terminal.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }
}
