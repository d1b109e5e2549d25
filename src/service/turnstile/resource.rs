use super::model::{
    build_challenge_model_from_widget, build_challenge_widget_from_model, TurnstileWidgetModel,
};
use crate::cloudflare::client::{AccountIdentifier, CloudflareClient};
use crate::cloudflare::http::is_not_found;
use crate::cloudflare::turnstile::{
    create_turnstile_widget, delete_turnstile_widget, get_turnstile_widget,
    update_turnstile_widget, CreateTurnstileWidgetParams, UpdateTurnstileWidgetParams,
};
use crate::framework::import::import_account_scoped;
use crate::framework::resource::{
    ConfigureRequest, ConfigureResponse, CreateRequest, CreateResponse, DeleteRequest,
    DeleteResponse, ImportStateRequest, ImportStateResponse, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::framework::types::StringValue;
use crate::framework::{Path, Resource, ResourceWithImportState};
use crate::service::{client_from_provider_data, configured_client};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// Resource implementation for challenge widgets
#[derive(Default)]
pub struct TurnstileWidgetResource {
    client: Option<Arc<CloudflareClient>>,
}

pub fn new_resource() -> Box<dyn Resource> {
    Box::new(TurnstileWidgetResource::default())
}

impl Resource for TurnstileWidgetResource {
    fn metadata(&self, req: &MetadataRequest, resp: &mut MetadataResponse) {
        resp.type_name = format!("{}_turnstile_widget", req.provider_type_name);
    }

    fn configure(&mut self, req: &ConfigureRequest, resp: &mut ConfigureResponse) {
        if let Some(client) = client_from_provider_data(req, resp) {
            self.client = Some(client);
        }
    }

    fn create(&self, req: CreateRequest) -> BoxFuture<'_, CreateResponse> {
        async move {
            let mut resp = CreateResponse::default();

            let Some(data) = resp.diagnostics.capture(req.plan.get::<TurnstileWidgetModel>())
            else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let widget = build_challenge_widget_from_model(&data);
            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!("Creating challenge widget {:?} in account {}", widget.name, account.as_str());

            let params = CreateTurnstileWidgetParams::from(&widget);
            let created = match create_turnstile_widget(client, &account, &params).await {
                Ok(created) => created,
                Err(err) => {
                    resp.diagnostics
                        .add_error("Error creating challenge widget", format!("{err:#}"));
                    return resp;
                }
            };

            let data = build_challenge_model_from_widget(data.account_id, created);
            let written = resp.state.set(&data);
            resp.diagnostics.capture(written);
            resp
        }
        .boxed()
    }

    fn read(&self, req: ReadRequest) -> BoxFuture<'_, ReadResponse> {
        async move {
            let mut resp = ReadResponse {
                state: req.state.clone(),
                ..Default::default()
            };

            let Some(data) = resp.diagnostics.capture(req.state.get::<TurnstileWidgetModel>())
            else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            let widget = match get_turnstile_widget(client, &account, data.id.value_str()).await {
                Ok(widget) => widget,
                Err(err) => {
                    if is_not_found(&err) {
                        tracing::warn!("Challenge widget {} no longer exists", data.id.value_str());
                    }
                    resp.diagnostics
                        .add_error("Error reading challenge widget", format!("{err:#}"));
                    return resp;
                }
            };

            let data = build_challenge_model_from_widget(data.account_id, widget);
            let written = resp.state.set(&data);
            resp.diagnostics.capture(written);
            resp
        }
        .boxed()
    }

    fn update(&self, req: UpdateRequest) -> BoxFuture<'_, UpdateResponse> {
        async move {
            let mut resp = UpdateResponse {
                state: req.state.clone(),
                ..Default::default()
            };

            let Some(mut data) = resp.diagnostics.capture(req.plan.get::<TurnstileWidgetModel>())
            else {
                return resp;
            };
            // The site key is computed; plans that omit it inherit it from state.
            if data.id.is_null() {
                let prior = req.state.get_attribute::<StringValue>(&Path::root("id"));
                let Some(prior) = resp.diagnostics.capture(prior) else {
                    return resp;
                };
                data.id = prior;
            }
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let widget = build_challenge_widget_from_model(&data);
            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!("Updating challenge widget {} in account {}", widget.site_key, account.as_str());

            let params = UpdateTurnstileWidgetParams::from(&widget);
            let updated = match update_turnstile_widget(client, &account, &params).await {
                Ok(updated) => updated,
                Err(err) => {
                    resp.diagnostics
                        .add_error("Error updating challenge widget", format!("{err:#}"));
                    return resp;
                }
            };

            let data = build_challenge_model_from_widget(data.account_id, updated);
            let written = resp.state.set(&data);
            resp.diagnostics.capture(written);
            resp
        }
        .boxed()
    }

    fn delete(&self, req: DeleteRequest) -> BoxFuture<'_, DeleteResponse> {
        async move {
            let mut resp = DeleteResponse {
                state: req.state.clone(),
                ..Default::default()
            };

            let Some(data) = resp.diagnostics.capture(req.state.get::<TurnstileWidgetModel>())
            else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!("Deleting challenge widget {} in account {}", data.id.value_str(), account.as_str());

            if let Err(err) = delete_turnstile_widget(client, &account, data.id.value_str()).await {
                resp.diagnostics
                    .add_error("Error deleting challenge widget", format!("{err:#}"));
                return resp;
            }

            resp.state.remove_resource();
            resp
        }
        .boxed()
    }

    fn as_importable(&self) -> Option<&dyn ResourceWithImportState> {
        Some(self)
    }
}

impl ResourceWithImportState for TurnstileWidgetResource {
    fn import_state(&self, req: &ImportStateRequest, resp: &mut ImportStateResponse) {
        import_account_scoped(
            &req.id,
            "Error importing challenge widget",
            "accounts_id/sitekey",
            resp,
        );
    }
}
