//! HTTP client wrapper for remote document fetching

use std::time::Duration;

use thiserror::Error;

/// Errors from the transport itself; status handling is the caller's.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Connection, TLS, timeout, redirect, or body-read failure
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
}

/// A completed response: body read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin reqwest wrapper. Redirect chains are followed by the default
/// policy; a 30s timeout bounds each request.
pub struct HttpClient {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            user_agent: user_agent.to_string(),
        }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| HttpError::RequestFailed {
                message: err.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| HttpError::RequestFailed {
                message: err.to_string(),
            })?;

        Ok(HttpResponse { status, body })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new("imago/0.1")
    }
}
