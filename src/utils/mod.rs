//! Utility modules supporting abstract resolution.
//!
//! - [`clean`]: reduce HTML to whitespace-collapsed plain text
//! - [`HttpClient`]: shared HTTP client with browser-like identification and timeouts
//! - [`read_capped`]: read a bounded prefix of a response body
//! - [`media_type`]: declared media type of a response
//!
//! # Cleaning markup
//!
//! ```rust
//! use paper_batch::utils::clean;
//!
//! let text = clean("<p>Neural nets\n are <em>great</em> &amp; fast.</p><script>x()</script>");
//! assert_eq!(text, "Neural nets are great & fast.");
//! ```

mod html;
mod http;

pub use html::clean;
pub use http::{media_type, read_capped, HttpClient};
