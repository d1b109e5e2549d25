//! Zero Trust device posture rules
//!
//! `accounts/{account_id}/devices/posture`

use super::client::{AccountIdentifier, CloudflareClient};
use super::http::null_as_default;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Platform selector for a posture rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRuleMatch {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub platform: String,
}

/// Flat wire shape of a rule's input. Which fields are meaningful depends on
/// the rule type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRuleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_disks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_distro_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_distro_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version_extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,
}

impl DevicePostureRuleInput {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A device posture rule as sent to and returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePostureRule {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub id: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub rule_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub schedule: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub expiration: String,
    #[serde(
        default,
        rename = "match",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub matches: Vec<DevicePostureRuleMatch>,
    #[serde(
        default,
        skip_serializing_if = "DevicePostureRuleInput::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub input: DevicePostureRuleInput,
}

fn rules_url(client: &CloudflareClient, account: &AccountIdentifier, rule_id: Option<&str>) -> String {
    match rule_id {
        Some(id) => client.account_url(account, &["devices", "posture", id]),
        None => client.account_url(account, &["devices", "posture"]),
    }
}

fn require_rule_id(rule_id: &str) -> Result<()> {
    if rule_id.is_empty() {
        anyhow::bail!("missing device posture rule ID");
    }
    Ok(())
}

/// Create a rule; `rule.id` is ignored
pub async fn create_device_posture_rule(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    rule: &DevicePostureRule,
) -> Result<DevicePostureRule> {
    let url = rules_url(client, account, None);
    let body = DevicePostureRule {
        id: String::new(),
        ..rule.clone()
    };

    client
        .post(&url, &body)
        .await
        .context("Failed to create device posture rule")
}

/// Fetch a rule by ID
pub async fn get_device_posture_rule(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    rule_id: &str,
) -> Result<DevicePostureRule> {
    require_rule_id(rule_id)?;

    let url = rules_url(client, account, Some(rule_id));
    client
        .get(&url)
        .await
        .with_context(|| format!("Failed to fetch device posture rule {}", rule_id))
}

/// Replace a rule; addressed by `rule.id`
pub async fn update_device_posture_rule(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    rule: &DevicePostureRule,
) -> Result<DevicePostureRule> {
    require_rule_id(&rule.id)?;

    let url = rules_url(client, account, Some(&rule.id));
    client
        .put(&url, rule)
        .await
        .with_context(|| format!("Failed to update device posture rule {}", rule.id))
}

/// Delete a rule
pub async fn delete_device_posture_rule(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    rule_id: &str,
) -> Result<()> {
    require_rule_id(rule_id)?;

    let url = rules_url(client, account, Some(rule_id));
    client
        .delete(&url)
        .await
        .with_context(|| format!("Failed to delete device posture rule {}", rule_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_serializes_match_and_type_keys() {
        let rule = DevicePostureRule {
            rule_type: "os_version".to_string(),
            name: "macs".to_string(),
            matches: vec![DevicePostureRuleMatch {
                platform: "mac".to_string(),
            }],
            input: DevicePostureRuleInput {
                version: Some("10.0.1".to_string()),
                operator: Some("==".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let body = serde_json::to_value(&rule).unwrap();
        assert_eq!(body["type"], "os_version");
        assert_eq!(body["match"], json!([{"platform": "mac"}]));
        assert_eq!(body["input"], json!({"version": "10.0.1", "operator": "=="}));
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_empty_input_is_omitted() {
        let rule = DevicePostureRule {
            rule_type: "warp".to_string(),
            name: "warp on".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&rule).unwrap();
        assert!(body.get("input").is_none());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let rule: DevicePostureRule = serde_json::from_value(json!({
            "id": "r1",
            "type": "warp",
            "name": "w",
            "description": null,
            "schedule": null,
            "expiration": null,
            "match": null,
            "input": null
        }))
        .unwrap();

        assert_eq!(rule.id, "r1");
        assert!(rule.description.is_empty());
        assert!(rule.expiration.is_empty());
        assert!(rule.matches.is_empty());
        assert!(rule.input.is_empty());

        let matched: DevicePostureRuleMatch =
            serde_json::from_value(json!({"platform": null})).unwrap();
        assert!(matched.platform.is_empty());
    }
}
