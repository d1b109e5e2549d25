//! Cloudflare resource handlers
//!
//! Maps declarative resource blocks onto Cloudflare API calls. Each handler
//! expands its local model into a wire request, calls the API, and flattens
//! the response back into state.
//!
//! # Module Structure
//!
//! - [`cloudflare`] - typed API client
//! - [`framework`] - plan/state values, diagnostics and the resource traits
//! - [`service`] - the resource handlers
//! - [`provider`] - client configuration and resource registry
//! - [`config`] - persistent configuration

pub mod cloudflare;
pub mod config;
pub mod framework;
pub mod provider;
pub mod service;

pub use provider::Provider;
