//! # paper-batch
//!
//! Splits a table of papers into fixed-size batches for parallel review and
//! augments every row with an abstract fetched from the paper's landing page.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PaperRecord, FetchStatus, Resolution)
//! - [`sources`]: Publisher families, each with a URL rule for locating the abstract
//! - [`resolver`]: Fetcher and abstract resolver
//! - [`batch`]: Batch windowing, record assembly and output
//! - [`utils`]: HTTP client and HTML normalization
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal progress display

pub mod batch;
pub mod config;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use batch::{BatchAssembler, BatchError, BatchWindow};
pub use models::{FetchStatus, PaperRecord, Resolution};
pub use resolver::AbstractResolver;
pub use sources::{Source, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
