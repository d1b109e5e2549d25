//! Cloudflare Client
//!
//! Main client for interacting with the Cloudflare v4 API, combining
//! credentials and HTTP functionality.

use super::auth::Credentials;
use super::http::CloudflareHttpClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Account scope for account-level endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentifier(pub String);

impl AccountIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Main Cloudflare client
#[derive(Clone)]
pub struct CloudflareClient {
    pub credentials: Credentials,
    pub http: CloudflareHttpClient,
    base_url: Url,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl CloudflareClient {
    /// Create a new client against the public API endpoint
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Create a new client against a custom endpoint (proxies, tests)
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url =
            Url::parse(trimmed).with_context(|| format!("Invalid API base URL: {}", base_url))?;

        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot be used as a base: {}", base_url);
        }

        let http = CloudflareHttpClient::new()?;

        tracing::debug!(
            "Cloudflare client ready: base_url={}, auth={}",
            base_url,
            credentials.kind()
        );

        Ok(Self {
            credentials,
            http,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Make a GET request to the API
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.http.get(url, &self.credentials).await
    }

    /// Make a POST request to the API
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.http.post(url, &self.credentials, body).await
    }

    /// Make a PUT request to the API
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.http.put(url, &self.credentials, body).await
    }

    /// Make a DELETE request to the API
    pub async fn delete(&self, url: &str) -> Result<()> {
        self.http.delete(url, &self.credentials).await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an API URL from path segments; each segment is percent-encoded
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.as_str().trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Build an account-scoped API URL
    pub fn account_url(&self, account: &AccountIdentifier, segments: &[&str]) -> String {
        let mut all = Vec::with_capacity(segments.len() + 2);
        all.push("accounts");
        all.push(account.as_str());
        all.extend_from_slice(segments);
        self.url(&all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CloudflareClient {
        CloudflareClient::with_base_url(Credentials::Token("t".to_string()), base).unwrap()
    }

    #[test]
    fn test_account_url() {
        let client = client(DEFAULT_BASE_URL);
        let url = client.account_url(
            &AccountIdentifier::new("acct123"),
            &["challenges", "widgets", "0x4AAF"],
        );
        assert_eq!(
            url,
            "https://api.cloudflare.com/client/v4/accounts/acct123/challenges/widgets/0x4AAF"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let client = client("http://127.0.0.1:8080/");
        let url = client.account_url(&AccountIdentifier::new("a/b"), &["devices"]);
        assert_eq!(url, "http://127.0.0.1:8080/accounts/a%2Fb/devices");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result =
            CloudflareClient::with_base_url(Credentials::Token("t".to_string()), "not a url");
        assert!(result.is_err());
    }
}
