//! HTTP client utilities.

use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::config::FetchConfig;

/// Shared HTTP client with the identification and timeouts used for page fetches
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default fetch settings
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::from_config(&FetchConfig::default())
    }

    /// Create a client from fetch settings
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Media type of a response, lower-cased and without parameters.
///
/// A missing or unreadable header is reported as `text/plain`.
pub fn media_type(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "text/plain".to_string())
}

/// Read at most `limit` bytes of the body; the remainder is never pulled off the wire.
pub async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }
    Ok(body)
}
