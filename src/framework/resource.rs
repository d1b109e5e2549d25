//! Resource lifecycle contract
//!
//! A resource is configured once with the provider's data, then each
//! lifecycle call runs to completion on its own. Requests carry the decoded
//! plan/state values; responses carry the new state plus diagnostics.

use super::diag::Diagnostics;
use super::state::{Plan, State};
use futures::future::BoxFuture;
use std::any::Any;
use std::sync::Arc;

/// Opaque value the provider hands to every resource on configure
pub type ProviderData = Arc<dyn Any + Send + Sync>;

pub struct MetadataRequest {
    pub provider_type_name: String,
}

#[derive(Debug, Default)]
pub struct MetadataResponse {
    pub type_name: String,
}

#[derive(Default)]
pub struct ConfigureRequest {
    pub provider_data: Option<ProviderData>,
}

#[derive(Debug, Default)]
pub struct ConfigureResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub plan: Plan,
}

#[derive(Debug, Default)]
pub struct CreateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub state: State,
}

/// `state` starts out as the prior state; a failed read leaves it untouched
#[derive(Debug, Default)]
pub struct ReadResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub plan: Plan,
    pub state: State,
}

/// `state` starts out as the prior state; a failed update leaves it untouched
#[derive(Debug, Default)]
pub struct UpdateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub state: State,
}

/// `state` starts out as the prior state and is emptied on success
#[derive(Debug, Default)]
pub struct DeleteResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct ImportStateRequest {
    pub id: String,
}

#[derive(Debug, Default)]
pub struct ImportStateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

pub trait Resource: Send + Sync {
    fn metadata(&self, req: &MetadataRequest, resp: &mut MetadataResponse);

    fn configure(&mut self, req: &ConfigureRequest, resp: &mut ConfigureResponse);

    fn create(&self, req: CreateRequest) -> BoxFuture<'_, CreateResponse>;

    fn read(&self, req: ReadRequest) -> BoxFuture<'_, ReadResponse>;

    fn update(&self, req: UpdateRequest) -> BoxFuture<'_, UpdateResponse>;

    fn delete(&self, req: DeleteRequest) -> BoxFuture<'_, DeleteResponse>;

    /// Resources that support `import` return themselves here
    fn as_importable(&self) -> Option<&dyn ResourceWithImportState> {
        None
    }
}

pub trait ResourceWithImportState: Resource {
    fn import_state(&self, req: &ImportStateRequest, resp: &mut ImportStateResponse);
}
