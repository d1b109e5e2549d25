//! Local stand-in for the plugin host
//!
//! The host decodes configuration into plan/state objects, calls a resource's
//! lifecycle methods, and reports diagnostics. This module holds the pieces
//! of that contract the resource handlers touch.
//!
//! - [`types`] - null-aware attribute values
//! - [`diag`] - diagnostics
//! - [`path`] / [`state`] - typed access to plan and state objects
//! - [`resource`] - lifecycle traits and request/response types
//! - [`expanders`] / [`flatteners`] - shared model ↔ wire helpers
//! - [`import`] - `<account_id>/<resource_id>` import IDs

pub mod diag;
pub mod expanders;
pub mod flatteners;
pub mod import;
pub mod path;
pub mod resource;
pub mod state;
pub mod types;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use path::Path;
pub use resource::{Resource, ResourceWithImportState};
pub use state::{Plan, State};
