//! HTTP utilities for Compute Engine REST API calls
//!
//! Every request runs through this module; it is the single boundary where
//! transport and HTTP-level failures are mapped into [`GceError::Api`].

use crate::error::GceError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and masks non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; a fixed byte offset can split a
        // multi-byte character.
        let mut cut = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..cut],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Compute Engine API calls
#[derive(Clone)]
pub struct GceHttpClient {
    client: Client,
}

impl GceHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, GceError> {
        let client = Client::builder()
            .user_agent(concat!("gce-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GceError::Api {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Make a GET request with optional query parameters
    pub async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        token: &str,
    ) -> Result<Value, GceError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Transport error: {}", e);
                GceError::transport()
            })?;

        read_json(response).await
    }

    /// Make a POST request with an optional JSON body
    pub async fn post(&self, url: &str, token: &str, body: Option<&Value>) -> Result<Value, GceError> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).bearer_auth(token);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Transport error: {}", e);
            GceError::transport()
        })?;

        read_json(response).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, token: &str) -> Result<Value, GceError> {
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Transport error: {}", e);
                GceError::transport()
            })?;

        read_json(response).await
    }

    /// Upload a multipart/mixed batch payload.
    ///
    /// Returns the response content type (carrying the multipart boundary)
    /// and the raw body for [`crate::gce::batch::decode`].
    pub async fn send_batch(
        &self,
        url: &str,
        token: &str,
        content_type: &str,
        payload: String,
    ) -> Result<(String, String), GceError> {
        tracing::debug!("POST {} (batch)", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Transport error: {}", e);
                GceError::transport()
            })?;

        let status = response.status();
        let response_content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Transport error: {}", e);
            GceError::transport()
        })?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(GceError::from_status(status));
        }

        Ok((response_content_type, body))
    }
}

/// Check the status and parse the body of a plain (non-batch) response.
async fn read_json(response: reqwest::Response) -> Result<Value, GceError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        tracing::error!("Transport error: {}", e);
        GceError::transport()
    })?;

    if !status.is_success() {
        // Only log sanitized/truncated error body to avoid leaking sensitive data
        tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        return Err(GceError::from_status(status));
    }

    // Handle empty response
    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| GceError::Api {
        message: format!("Failed to parse response JSON: {}", e),
    })
}
