//! Resource handlers
//!
//! - [`turnstile`] - `cloudflare_turnstile_widget`
//! - [`device_posture_rule`] - `cloudflare_device_posture_rule`

pub mod device_posture_rule;
pub mod turnstile;

use crate::cloudflare::client::CloudflareClient;
use crate::framework::resource::{ConfigureRequest, ConfigureResponse};
use crate::framework::Diagnostics;
use std::sync::Arc;

/// Pull the shared client out of the provider data.
///
/// No provider data means the provider is not configured yet; the resource
/// stays unconfigured without an error.
pub(crate) fn client_from_provider_data(
    req: &ConfigureRequest,
    resp: &mut ConfigureResponse,
) -> Option<Arc<CloudflareClient>> {
    let data = req.provider_data.as_ref()?;

    match Arc::clone(data).downcast::<CloudflareClient>() {
        Ok(client) => Some(client),
        Err(_) => {
            resp.diagnostics.add_error(
                "Unexpected Resource Configure Type",
                "Expected a CloudflareClient as provider data. Please report this issue to the provider developers.",
            );
            None
        }
    }
}

pub(crate) fn configured_client<'a>(
    client: &'a Option<Arc<CloudflareClient>>,
    diagnostics: &mut Diagnostics,
) -> Option<&'a CloudflareClient> {
    if client.is_none() {
        diagnostics.add_error(
            "Unconfigured Cloudflare client",
            "The resource was used before the provider was configured.",
        );
    }
    client.as_deref()
}
