//! Turnstile challenge widgets
//!
//! `accounts/{account_id}/challenges/widgets`

use super::client::{AccountIdentifier, CloudflareClient};
use super::http::null_as_default;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A challenge widget as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnstileWidget {
    #[serde(default, rename = "sitekey", deserialize_with = "null_as_default")]
    pub site_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domains: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot_fight_mode: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, rename = "offlabel", deserialize_with = "null_as_default")]
    pub off_label: bool,
}

/// Body of a widget create call. The site key and secret are server-assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTurnstileWidgetParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
    pub bot_fight_mode: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(rename = "offlabel")]
    pub off_label: bool,
}

/// Body of a widget update call; `site_key` addresses the widget and is not sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTurnstileWidgetParams {
    #[serde(skip)]
    pub site_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
    pub bot_fight_mode: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(rename = "offlabel")]
    pub off_label: bool,
}

fn widgets_url(client: &CloudflareClient, account: &AccountIdentifier, site_key: Option<&str>) -> String {
    match site_key {
        Some(key) => client.account_url(account, &["challenges", "widgets", key]),
        None => client.account_url(account, &["challenges", "widgets"]),
    }
}

fn require_site_key(site_key: &str) -> Result<()> {
    if site_key.is_empty() {
        anyhow::bail!("missing site key");
    }
    Ok(())
}

/// Create a widget
pub async fn create_turnstile_widget(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    params: &CreateTurnstileWidgetParams,
) -> Result<TurnstileWidget> {
    let url = widgets_url(client, account, None);
    let widget: TurnstileWidget = client
        .post(&url, params)
        .await
        .context("Failed to create turnstile widget")?;

    tracing::debug!(
        "Created turnstile widget {} (created_on={:?})",
        widget.site_key,
        widget.created_on
    );
    Ok(widget)
}

/// Fetch a widget by site key
pub async fn get_turnstile_widget(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    site_key: &str,
) -> Result<TurnstileWidget> {
    require_site_key(site_key)?;

    let url = widgets_url(client, account, Some(site_key));
    client
        .get(&url)
        .await
        .with_context(|| format!("Failed to fetch turnstile widget {}", site_key))
}

/// Replace a widget's settings
pub async fn update_turnstile_widget(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    params: &UpdateTurnstileWidgetParams,
) -> Result<TurnstileWidget> {
    require_site_key(&params.site_key)?;

    let url = widgets_url(client, account, Some(&params.site_key));
    let widget: TurnstileWidget = client
        .put(&url, params)
        .await
        .with_context(|| format!("Failed to update turnstile widget {}", params.site_key))?;

    tracing::debug!(
        "Updated turnstile widget {} (modified_on={:?})",
        widget.site_key,
        widget.modified_on
    );
    Ok(widget)
}

/// Delete a widget
pub async fn delete_turnstile_widget(
    client: &CloudflareClient,
    account: &AccountIdentifier,
    site_key: &str,
) -> Result<()> {
    require_site_key(site_key)?;

    let url = widgets_url(client, account, Some(site_key));
    client
        .delete(&url)
        .await
        .with_context(|| format!("Failed to delete turnstile widget {}", site_key))
}
