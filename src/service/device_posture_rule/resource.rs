use super::model::{build_model_from_rule, build_rule_from_model, DevicePostureRuleModel};
use crate::cloudflare::client::{AccountIdentifier, CloudflareClient};
use crate::cloudflare::device_posture::{
    create_device_posture_rule, delete_device_posture_rule, get_device_posture_rule,
    update_device_posture_rule, DevicePostureRule,
};
use crate::cloudflare::http::is_not_found;
use crate::framework::import::import_account_scoped;
use crate::framework::resource::{
    ConfigureRequest, ConfigureResponse, CreateRequest, CreateResponse, DeleteRequest,
    DeleteResponse, ImportStateRequest, ImportStateResponse, MetadataRequest, MetadataResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::framework::types::StringValue;
use crate::framework::{Diagnostics, Path, Resource, ResourceWithImportState};
use crate::service::{client_from_provider_data, configured_client};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// Resource implementation for Zero Trust device posture rules
#[derive(Default)]
pub struct DevicePostureRuleResource {
    client: Option<Arc<CloudflareClient>>,
}

pub fn new_resource() -> Box<dyn Resource> {
    Box::new(DevicePostureRuleResource::default())
}

fn expand(model: &DevicePostureRuleModel, diagnostics: &mut Diagnostics) -> Option<DevicePostureRule> {
    match build_rule_from_model(model) {
        Ok(rule) => Some(rule),
        Err(err) => {
            diagnostics.add_error("Error building device posture rule", err.to_string());
            None
        }
    }
}

impl Resource for DevicePostureRuleResource {
    fn metadata(&self, req: &MetadataRequest, resp: &mut MetadataResponse) {
        resp.type_name = format!("{}_device_posture_rule", req.provider_type_name);
    }

    fn configure(&mut self, req: &ConfigureRequest, resp: &mut ConfigureResponse) {
        if let Some(client) = client_from_provider_data(req, resp) {
            self.client = Some(client);
        }
    }

    fn create(&self, req: CreateRequest) -> BoxFuture<'_, CreateResponse> {
        async move {
            let mut resp = CreateResponse::default();

            let Some(data) = resp.diagnostics.capture(req.plan.get::<DevicePostureRuleModel>())
            else {
                return resp;
            };
            let Some(rule) = expand(&data, &mut resp.diagnostics) else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!(
                "Creating {} device posture rule {:?} in account {}",
                rule.rule_type,
                rule.name,
                account.as_str()
            );

            let created = match create_device_posture_rule(client, &account, &rule).await {
                Ok(created) => created,
                Err(err) => {
                    resp.diagnostics
                        .add_error("Error creating Device Posture Rule", format!("{err:#}"));
                    return resp;
                }
            };

            let data = build_model_from_rule(data.account_id, created, &mut resp.diagnostics);
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

            let Some(data) = resp.diagnostics.capture(req.state.get::<DevicePostureRuleModel>())
            else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            let rule = match get_device_posture_rule(client, &account, data.id.value_str()).await {
                Ok(rule) => rule,
                Err(err) => {
                    if is_not_found(&err) {
                        tracing::warn!("Device posture rule {} no longer exists", data.id.value_str());
                    }
                    resp.diagnostics.add_error(
                        format!("Error finding Device Posture Rule {}", data.id.value_str()),
                        format!("{err:#}"),
                    );
                    return resp;
                }
            };

            let data = build_model_from_rule(data.account_id, rule, &mut resp.diagnostics);
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

            let Some(mut data) = resp.diagnostics.capture(req.plan.get::<DevicePostureRuleModel>())
            else {
                return resp;
            };
            // The rule ID is computed; plans that omit it inherit it from state.
            if data.id.is_null() {
                let prior = req.state.get_attribute::<StringValue>(&Path::root("id"));
                let Some(prior) = resp.diagnostics.capture(prior) else {
                    return resp;
                };
                data.id = prior;
            }
            let Some(rule) = expand(&data, &mut resp.diagnostics) else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!(
                "Updating device posture rule {} in account {}",
                rule.id,
                account.as_str()
            );

            let updated = match update_device_posture_rule(client, &account, &rule).await {
                Ok(updated) => updated,
                Err(err) => {
                    resp.diagnostics
                        .add_error("Error updating Device Posture Rule", format!("{err:#}"));
                    return resp;
                }
            };

            let data = build_model_from_rule(data.account_id, updated, &mut resp.diagnostics);
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

            let Some(data) = resp.diagnostics.capture(req.state.get::<DevicePostureRuleModel>())
            else {
                return resp;
            };
            let Some(client) = configured_client(&self.client, &mut resp.diagnostics) else {
                return resp;
            };

            let account = AccountIdentifier::new(data.account_id.value_str());
            tracing::info!(
                "Deleting device posture rule {} in account {}",
                data.id.value_str(),
                account.as_str()
            );

            if let Err(err) = delete_device_posture_rule(client, &account, data.id.value_str()).await {
                resp.diagnostics
                    .add_error("Error deleting Device Posture Rule", format!("{err:#}"));
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

impl ResourceWithImportState for DevicePostureRuleResource {
    fn import_state(&self, req: &ImportStateRequest, resp: &mut ImportStateResponse) {
        import_account_scoped(
            &req.id,
            "Error importing Device Posture Rule",
            "accountID/devicePostureRuleID",
            resp,
        );
    }
}
