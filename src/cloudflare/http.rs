//! HTTP utilities for Cloudflare API v4 calls

use super::auth::Credentials;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let total = body.chars().count();
    let truncated = if total > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Deserialize a field the API may send as `null`, treating it like a
/// missing one
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single entry of the `errors` / `messages` arrays in an API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Standard v4 response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<ResponseInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    messages: Vec<ResponseInfo>,
    result: Option<T>,
}

fn describe(errors: &[ResponseInfo]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let joined = errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join(", ");
    format!(": {}", joined)
}

/// Failure reported by the API itself, as opposed to transport errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API request failed with status {}{}", .status, describe(.errors))]
    Status {
        status: StatusCode,
        errors: Vec<ResponseInfo>,
    },
    #[error("API reported an unsuccessful response{}", describe(.errors))]
    Unsuccessful { errors: Vec<ResponseInfo> },
    #[error("API response did not contain a result")]
    MissingResult,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Check whether an error chain bottoms out in a 404 from the API
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(ApiError::is_not_found)
}

/// HTTP client wrapper for Cloudflare API calls
#[derive(Clone)]
pub struct CloudflareHttpClient {
    client: Client,
}

impl CloudflareHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cfprov/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request and return the envelope's `result`
    pub async fn get<T: DeserializeOwned>(&self, url: &str, credentials: &Credentials) -> Result<T> {
        tracing::debug!("GET {}", url);

        let request = credentials.apply(self.client.get(url));
        self.execute(request).await?.ok_or_else(|| ApiError::MissingResult.into())
    }

    /// Make a POST request with a JSON body and return the envelope's `result`
    pub async fn post<B, T>(&self, url: &str, credentials: &Credentials, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", url);

        let request = credentials.apply(self.client.post(url)).json(body);
        self.execute(request).await?.ok_or_else(|| ApiError::MissingResult.into())
    }

    /// Make a PUT request with a JSON body and return the envelope's `result`
    pub async fn put<B, T>(&self, url: &str, credentials: &Credentials, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("PUT {}", url);

        let request = credentials.apply(self.client.put(url)).json(body);
        self.execute(request).await?.ok_or_else(|| ApiError::MissingResult.into())
    }

    /// Make a DELETE request; the `result` payload, if any, is discarded
    pub async fn delete(&self, url: &str, credentials: &Credentials) -> Result<()> {
        tracing::debug!("DELETE {}", url);

        let request = credentials.apply(self.client.delete(url));
        self.execute::<IgnoredAny>(request).await?;
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let errors = serde_json::from_str::<Envelope<IgnoredAny>>(&body)
                .map(|envelope| envelope.errors)
                .unwrap_or_default();
            return Err(ApiError::Status { status, errors }.into());
        }

        // Handle empty response
        if body.is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).context("Failed to parse response JSON")?;

        if !envelope.success {
            tracing::error!("API returned success=false: {}", sanitize_for_log(&body));
            return Err(ApiError::Unsuccessful {
                errors: envelope.errors,
            }
            .into());
        }

        for message in &envelope.messages {
            tracing::debug!("API message {}: {}", message.code, message.message);
        }

        Ok(envelope.result)
    }
}
