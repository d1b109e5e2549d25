use super::input::{PostureInput, PostureRuleType, UnsupportedRuleType};
use crate::cloudflare::device_posture::{
    DevicePostureRule, DevicePostureRuleInput, DevicePostureRuleMatch,
};
use crate::framework::types::{BoolValue, StringSet, StringValue};
use crate::framework::{expanders, flatteners, Diagnostics};
use serde::{Deserialize, Serialize};

/// Local state of a `device_posture_rule`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRuleModel {
    #[serde(default)]
    pub account_id: StringValue,
    #[serde(default)]
    pub id: StringValue,
    #[serde(default)]
    pub name: StringValue,
    #[serde(default, rename = "type")]
    pub rule_type: StringValue,
    #[serde(default)]
    pub description: StringValue,
    #[serde(default)]
    pub schedule: StringValue,
    #[serde(default)]
    pub expiration: StringValue,
    #[serde(default, rename = "match")]
    pub matches: Vec<DevicePostureRuleMatchModel>,
    #[serde(default)]
    pub input: Vec<DevicePostureRuleInputModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRuleMatchModel {
    #[serde(default)]
    pub platform: StringValue,
}

/// The `input` block. Which attributes apply depends on the rule type; the
/// rest stay null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRuleInputModel {
    #[serde(default)]
    pub id: StringValue,
    #[serde(default)]
    pub path: StringValue,
    #[serde(default)]
    pub exists: BoolValue,
    #[serde(default)]
    pub thumbprint: StringValue,
    #[serde(default)]
    pub sha256: StringValue,
    #[serde(default)]
    pub running: BoolValue,
    #[serde(default)]
    pub require_all: BoolValue,
    #[serde(default)]
    pub check_disks: StringSet,
    #[serde(default)]
    pub enabled: BoolValue,
    #[serde(default)]
    pub version: StringValue,
    #[serde(default)]
    pub operator: StringValue,
    #[serde(default)]
    pub domain: StringValue,
    #[serde(default)]
    pub os_distro_name: StringValue,
    #[serde(default)]
    pub os_distro_revision: StringValue,
    #[serde(default)]
    pub os_version_extra: StringValue,
    #[serde(default)]
    pub certificate_id: StringValue,
    #[serde(default)]
    pub cn: StringValue,
}

fn expand_input_block(block: &DevicePostureRuleInputModel) -> DevicePostureRuleInput {
    DevicePostureRuleInput {
        id: expanders::optional_string(&block.id),
        path: expanders::optional_string(&block.path),
        exists: expanders::optional_bool(&block.exists),
        thumbprint: expanders::optional_string(&block.thumbprint),
        sha256: expanders::optional_string(&block.sha256),
        running: expanders::optional_bool(&block.running),
        require_all: expanders::optional_bool(&block.require_all),
        check_disks: expanders::optional_string_set(&block.check_disks),
        enabled: expanders::optional_bool(&block.enabled),
        version: expanders::optional_string(&block.version),
        operator: expanders::optional_string(&block.operator),
        domain: expanders::optional_string(&block.domain),
        os_distro_name: expanders::optional_string(&block.os_distro_name),
        os_distro_revision: expanders::optional_string(&block.os_distro_revision),
        os_version_extra: expanders::optional_string(&block.os_version_extra),
        certificate_id: expanders::optional_string(&block.certificate_id),
        cn: expanders::optional_string(&block.cn),
    }
}

fn flatten_input_block(input: &PostureInput) -> Option<DevicePostureRuleInputModel> {
    let mut block = DevicePostureRuleInputModel::default();

    match input {
        PostureInput::SerialNumber(check) | PostureInput::UniqueClientId(check) => {
            block.id = flatteners::optional_string(check.id.as_ref());
        }
        PostureInput::OsVersion(check) => {
            block.version = flatteners::optional_string(check.version.as_ref());
            block.operator = flatteners::optional_string(check.operator.as_ref());
            block.os_distro_name = flatteners::optional_string(check.os_distro_name.as_ref());
            block.os_distro_revision =
                flatteners::optional_string(check.os_distro_revision.as_ref());
            block.os_version_extra = flatteners::optional_string(check.os_version_extra.as_ref());
        }
        PostureInput::DomainJoined(check) => {
            block.domain = flatteners::optional_string(check.domain.as_ref());
        }
        PostureInput::Firewall(check) => {
            block.enabled = flatteners::optional_bool(check.enabled);
        }
        PostureInput::DiskEncryption(check) => {
            block.require_all = flatteners::optional_bool(check.require_all);
            block.check_disks = flatteners::optional_string_set(check.check_disks.as_ref());
        }
        PostureInput::File(check) => {
            block.path = flatteners::optional_string(check.path.as_ref());
            block.exists = flatteners::optional_bool(check.exists);
            block.sha256 = flatteners::optional_string(check.sha256.as_ref());
            block.thumbprint = flatteners::optional_string(check.thumbprint.as_ref());
        }
        PostureInput::Application(check) => {
            block.path = flatteners::optional_string(check.path.as_ref());
            block.sha256 = flatteners::optional_string(check.sha256.as_ref());
            block.thumbprint = flatteners::optional_string(check.thumbprint.as_ref());
            block.running = flatteners::optional_bool(check.running);
        }
        PostureInput::ClientCertificate(check) => {
            block.certificate_id = flatteners::optional_string(check.certificate_id.as_ref());
            block.cn = flatteners::optional_string(check.cn.as_ref());
        }
        PostureInput::Warp | PostureInput::Gateway => return None,
    }

    Some(block)
}

/// Expand the model into a wire rule. Input attributes that do not belong
/// to the rule's type are dropped.
pub fn build_rule_from_model(
    model: &DevicePostureRuleModel,
) -> Result<DevicePostureRule, UnsupportedRuleType> {
    let rule_type: PostureRuleType = model.rule_type.value_str().parse()?;

    let raw_input = model
        .input
        .first()
        .map(expand_input_block)
        .unwrap_or_default();
    let input = PostureInput::from_wire(rule_type, &raw_input);

    Ok(DevicePostureRule {
        id: model.id.value_string(),
        rule_type: rule_type.as_str().to_string(),
        name: model.name.value_string(),
        description: model.description.value_string(),
        schedule: model.schedule.value_string(),
        expiration: model.expiration.value_string(),
        matches: model
            .matches
            .iter()
            .map(|m| DevicePostureRuleMatch {
                platform: m.platform.value_string(),
            })
            .collect(),
        input: input.to_wire(),
    })
}

/// Flatten an API rule into the model. A rule type this crate does not know
/// keeps its type and drops its input, with a warning.
///
/// `description`, `schedule` and `expiration` are null whenever the API
/// leaves them empty. The API omits empty strings, so a plan that sets one
/// of them to `""` reads back as null rather than known-empty.
pub fn build_model_from_rule(
    account_id: StringValue,
    rule: DevicePostureRule,
    diagnostics: &mut Diagnostics,
) -> DevicePostureRuleModel {
    let input = match rule.rule_type.parse::<PostureRuleType>() {
        Ok(rule_type) => flatten_input_block(&PostureInput::from_wire(rule_type, &rule.input))
            .into_iter()
            .collect(),
        Err(err) => {
            diagnostics.add_warning(
                "Unsupported device posture rule input",
                format!("{}; the input block was not read", err),
            );
            Vec::new()
        }
    };

    DevicePostureRuleModel {
        account_id,
        id: flatteners::string(rule.id),
        name: flatteners::string(rule.name),
        rule_type: flatteners::string(rule.rule_type),
        description: flatteners::string_or_null(&rule.description),
        schedule: flatteners::string_or_null(&rule.schedule),
        expiration: flatteners::string_or_null(&rule.expiration),
        matches: rule
            .matches
            .into_iter()
            .map(|m| DevicePostureRuleMatchModel {
                platform: flatteners::string(m.platform),
            })
            .collect(),
        input,
    }
}
