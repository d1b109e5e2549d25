//! Configuration Management
//!
//! Handles persistent configuration storage for cfprov. Secrets are never
//! written here; credentials come from the environment.

use crate::cloudflare::auth::{Credentials, ENV_API_KEY, ENV_API_TOKEN, ENV_EMAIL};
use crate::cloudflare::client::DEFAULT_BASE_URL;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the default account
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";

/// Environment variable overriding the API endpoint
pub const ENV_BASE_URL: &str = "CLOUDFLARE_API_BASE_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Account used when a plan does not name one
    #[serde(default)]
    pub account_id: Option<String>,
    /// API endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Email paired with `CLOUDFLARE_API_KEY`
    #[serde(default)]
    pub email: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cfprov").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective account (CLI > config > environment)
    pub fn effective_account_id(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.account_id.clone())
            .or_else(|| env_non_empty(ENV_ACCOUNT_ID))
    }

    /// Get effective API endpoint (CLI > config > environment > public API)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .or_else(|| env_non_empty(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Resolve credentials from the environment, taking the email from the
    /// config file when the environment does not set one
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::resolve(
            env_non_empty(ENV_API_TOKEN),
            env_non_empty(ENV_API_KEY),
            env_non_empty(ENV_EMAIL).or_else(|| self.email.clone()),
        )
    }

    /// Set account and save
    pub fn set_account_id(&mut self, account_id: &str) -> Result<()> {
        self.account_id = Some(account_id.to_string());
        self.save()
    }

    /// Set API endpoint and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Some(base_url.to_string());
        self.save()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
