//! Fetch status taxonomy.
//!
//! Every abstract-resolution attempt ends in exactly one [`FetchStatus`]. The
//! string form (`"ok"` or `"error:<kind>"`) is part of the batch file format,
//! so the `Display` impls here are the wire encoding.

use serde::{Serialize, Serializer};
use std::fmt;

/// Category of a transport-level failure (anything that is not an HTTP status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// The request or body read exceeded the configured timeout
    Timeout,
    /// DNS resolution or TCP/TLS connection failed
    Connect,
    /// Too many redirects, or a redirect loop
    Redirect,
    /// The URL could not be turned into a request
    InvalidUrl,
    /// The response body stream failed mid-read
    Body,
    /// The response body could not be decoded (compression, encoding)
    Decode,
    /// Any other request failure
    Request,
}

impl TransportKind {
    /// Category name used in the status string
    pub fn name(&self) -> &'static str {
        match self {
            TransportKind::Timeout => "Timeout",
            TransportKind::Connect => "ConnectError",
            TransportKind::Redirect => "RedirectError",
            TransportKind::InvalidUrl => "InvalidUrl",
            TransportKind::Body => "BodyError",
            TransportKind::Decode => "DecodeError",
            TransportKind::Request => "RequestError",
        }
    }
}

impl From<&reqwest::Error> for TransportKind {
    fn from(err: &reqwest::Error) -> Self {
        // Order matters: a timed-out connect reports both is_timeout and is_connect.
        if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_builder() {
            TransportKind::InvalidUrl
        } else if err.is_connect() {
            TransportKind::Connect
        } else if err.is_redirect() {
            TransportKind::Redirect
        } else if err.is_decode() {
            TransportKind::Decode
        } else if err.is_body() {
            TransportKind::Body
        } else {
            TransportKind::Request
        }
    }
}

/// Why a record has no fetched abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailure {
    /// The row had no URL, so nothing was requested
    MissingUrl,
    /// The server answered with an error status
    Http(u16),
    /// The request never produced a usable response
    Transport(TransportKind),
    /// The server declared a PDF body; no text rule applies
    PdfContent,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::MissingUrl => f.write_str("missing-url"),
            FetchFailure::Http(code) => write!(f, "http:{}", code),
            FetchFailure::Transport(kind) => f.write_str(kind.name()),
            FetchFailure::PdfContent => f.write_str("pdf-content"),
        }
    }
}

impl From<TransportKind> for FetchFailure {
    fn from(kind: TransportKind) -> Self {
        FetchFailure::Transport(kind)
    }
}

/// Terminal outcome of one abstract-resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Ok,
    Error(FetchFailure),
}

impl FetchStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchStatus::Ok)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Ok => f.write_str("ok"),
            FetchStatus::Error(failure) => write!(f, "error:{}", failure),
        }
    }
}

impl Serialize for FetchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of resolving one URL: an abstract with `ok`, or no text with an error.
///
/// The fields are private so the text is present exactly when the status is `ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    text: Option<String>,
    status: FetchStatus,
}

impl Resolution {
    /// A successful resolution carrying the extracted abstract
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            status: FetchStatus::Ok,
        }
    }

    /// A failed resolution
    pub fn failed(failure: FetchFailure) -> Self {
        Self {
            text: None,
            status: FetchStatus::Error(failure),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Split into `(text, status)`
    pub fn into_parts(self) -> (Option<String>, FetchStatus) {
        (self.text, self.status)
    }
}
