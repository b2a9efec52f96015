//! Core data models for batch records and fetch outcomes.

mod record;
mod status;

pub use record::{PaperRecord, SourceRow};
pub use status::{FetchFailure, FetchStatus, Resolution, TransportKind};
