//! Cloudflare Authentication
//!
//! Handles authentication using either a scoped API token or the legacy
//! global API key paired with the account email.

use anyhow::{bail, Result};
use reqwest::RequestBuilder;

/// Environment variable holding a scoped API token
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Environment variable holding the global API key
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";

/// Environment variable holding the account email used with the global API key
pub const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";

/// Credentials used to sign every API request
#[derive(Clone)]
pub enum Credentials {
    /// Scoped API token, sent as a bearer token
    Token(String),
    /// Global API key, sent as `X-Auth-Key` + `X-Auth-Email`
    Key { api_key: String, email: String },
}

impl Credentials {
    /// Build credentials from explicit values.
    ///
    /// A token wins over a key when both are present. Some Zero Trust
    /// endpoints still reject tokens, so callers that need the key can pass
    /// `None` for the token.
    pub fn resolve(
        api_token: Option<String>,
        api_key: Option<String>,
        email: Option<String>,
    ) -> Result<Self> {
        if let Some(token) = api_token.filter(|t| !t.is_empty()) {
            return Ok(Self::Token(token));
        }

        match (api_key.filter(|k| !k.is_empty()), email.filter(|e| !e.is_empty())) {
            (Some(api_key), Some(email)) => Ok(Self::Key { api_key, email }),
            (Some(_), None) => bail!("{} is set but {} is missing", ENV_API_KEY, ENV_EMAIL),
            _ => bail!(
                "No Cloudflare credentials configured. Set {} or {} and {}",
                ENV_API_TOKEN,
                ENV_API_KEY,
                ENV_EMAIL
            ),
        }
    }

    /// Attach the authentication headers to a request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Token(token) => request.bearer_auth(token),
            Self::Key { api_key, email } => request
                .header("X-Auth-Key", api_key)
                .header("X-Auth-Email", email),
        }
    }

    /// Short label for logs; never includes secret material
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "api_token",
            Self::Key { .. } => "api_key",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Credentials::Token(***)"),
            Self::Key { email, .. } => write!(f, "Credentials::Key {{ email: {email:?}, api_key: *** }}"),
        }
    }
}
