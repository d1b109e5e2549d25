//! Cloudflare API interaction module
//!
//! This module provides the typed client for the Cloudflare v4 API calls the
//! resource handlers make.
//!
//! # Module Structure
//!
//! - [`auth`] - API token / API key credentials
//! - [`client`] - Main client holding credentials, HTTP client and base URL
//! - [`http`] - HTTP utilities, response envelope and API errors
//! - [`turnstile`] - Challenge widget endpoints
//! - [`device_posture`] - Device posture rule endpoints
//!
//! # Example
//!
//! ```ignore
//! use cfprov::cloudflare::{auth::Credentials, client::{AccountIdentifier, CloudflareClient}};
//! use cfprov::cloudflare::turnstile::get_turnstile_widget;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = CloudflareClient::new(Credentials::Token("...".into()))?;
//!     let widget = get_turnstile_widget(&client, &AccountIdentifier::new("acct"), "0x4AAF").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod device_posture;
pub mod http;
pub mod turnstile;
