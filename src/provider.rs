//! Provider: owns the configured client and hands it to every resource

use crate::cloudflare::auth::Credentials;
use crate::cloudflare::client::CloudflareClient;
use crate::framework::resource::{
    ConfigureRequest, ConfigureResponse, MetadataRequest, MetadataResponse, ProviderData,
};
use crate::framework::{Diagnostics, Resource};
use crate::service::{device_posture_rule, turnstile};
use std::sync::Arc;

/// Prefix of every resource type name
pub const PROVIDER_TYPE_NAME: &str = "cloudflare";

type ResourceFactory = fn() -> Box<dyn Resource>;

const RESOURCES: &[ResourceFactory] = &[turnstile::new_resource, device_posture_rule::new_resource];

#[derive(Default)]
pub struct Provider {
    data: Option<ProviderData>,
}

impl Provider {
    /// An unconfigured provider; resources built from it report errors on use
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the API client. Failures are reported as diagnostics and leave
    /// the provider unconfigured.
    pub fn configure(&mut self, credentials: Credentials, base_url: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        match CloudflareClient::with_base_url(credentials, base_url) {
            Ok(client) => {
                tracing::info!("Provider configured for {}", client.base_url());
                self.data = Some(Arc::new(client));
            }
            Err(err) => diagnostics.add_error(
                "Unable to create Cloudflare client",
                format!("{err:#}"),
            ),
        }

        diagnostics
    }

    /// A provider around an existing client
    pub fn with_client(client: CloudflareClient) -> Self {
        Self {
            data: Some(Arc::new(client)),
        }
    }

    /// Full type names of every resource, e.g. `cloudflare_turnstile_widget`
    pub fn resource_type_names() -> Vec<String> {
        RESOURCES
            .iter()
            .map(|factory| type_name_of(factory().as_ref()))
            .collect()
    }

    /// Build and configure a resource by type name. The provider prefix is
    /// optional, so `turnstile_widget` also resolves.
    pub fn resource(&self, name: &str) -> Result<Box<dyn Resource>, Diagnostics> {
        let wanted = if name.starts_with(&format!("{}_", PROVIDER_TYPE_NAME)) {
            name.to_string()
        } else {
            format!("{}_{}", PROVIDER_TYPE_NAME, name)
        };

        let mut diagnostics = Diagnostics::new();
        let Some(mut resource) = RESOURCES
            .iter()
            .map(|factory| factory())
            .find(|resource| type_name_of(resource.as_ref()) == wanted)
        else {
            diagnostics.add_error(
                "Unknown resource type",
                format!(
                    "{} is not supported. Supported types: {}",
                    name,
                    Self::resource_type_names().join(", ")
                ),
            );
            return Err(diagnostics);
        };

        let req = ConfigureRequest {
            provider_data: self.data.clone(),
        };
        let mut resp = ConfigureResponse::default();
        resource.configure(&req, &mut resp);
        if resp.diagnostics.has_error() {
            return Err(resp.diagnostics);
        }

        Ok(resource)
    }
}

fn type_name_of(resource: &dyn Resource) -> String {
    let mut resp = MetadataResponse::default();
    resource.metadata(
        &MetadataRequest {
            provider_type_name: PROVIDER_TYPE_NAME.to_string(),
        },
        &mut resp,
    );
    resp.type_name
}
