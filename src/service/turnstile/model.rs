use crate::cloudflare::turnstile::{
    CreateTurnstileWidgetParams, TurnstileWidget, UpdateTurnstileWidgetParams,
};
use crate::framework::types::{BoolValue, StringSet, StringValue};
use crate::framework::{expanders, flatteners};
use serde::{Deserialize, Serialize};

/// Local state of a `turnstile_widget`. `id` is the widget's site key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnstileWidgetModel {
    #[serde(default)]
    pub account_id: StringValue,
    #[serde(default)]
    pub id: StringValue,
    #[serde(default)]
    pub secret: StringValue,
    #[serde(default)]
    pub name: StringValue,
    #[serde(default)]
    pub mode: StringValue,
    #[serde(default)]
    pub domains: StringSet,
    #[serde(default)]
    pub bot_fight_mode: BoolValue,
    #[serde(default)]
    pub region: StringValue,
    #[serde(default)]
    pub offlabel: BoolValue,
}

/// Expand the model into the wire widget. The secret is server-assigned and
/// never leaves the model.
pub fn build_challenge_widget_from_model(model: &TurnstileWidgetModel) -> TurnstileWidget {
    TurnstileWidget {
        site_key: model.id.value_string(),
        name: model.name.value_string(),
        bot_fight_mode: model.bot_fight_mode.value_bool(),
        mode: model.mode.value_string(),
        region: model.region.value_string(),
        domains: expanders::string_set(&model.domains),
        off_label: model.offlabel.value_bool(),
        ..Default::default()
    }
}

/// Flatten an API widget into the model, keeping the caller's account ID
pub fn build_challenge_model_from_widget(
    account_id: StringValue,
    widget: TurnstileWidget,
) -> TurnstileWidgetModel {
    TurnstileWidgetModel {
        account_id,
        id: flatteners::string(widget.site_key),
        secret: flatteners::string(widget.secret),
        name: flatteners::string(widget.name),
        mode: flatteners::string(widget.mode),
        domains: flatteners::string_set(widget.domains),
        bot_fight_mode: widget.bot_fight_mode.into(),
        region: flatteners::string(widget.region),
        offlabel: widget.off_label.into(),
    }
}

impl From<&TurnstileWidget> for CreateTurnstileWidgetParams {
    fn from(widget: &TurnstileWidget) -> Self {
        Self {
            name: widget.name.clone(),
            domains: widget.domains.clone(),
            mode: widget.mode.clone(),
            bot_fight_mode: widget.bot_fight_mode,
            region: widget.region.clone(),
            off_label: widget.off_label,
        }
    }
}

impl From<&TurnstileWidget> for UpdateTurnstileWidgetParams {
    fn from(widget: &TurnstileWidget) -> Self {
        Self {
            site_key: widget.site_key.clone(),
            name: widget.name.clone(),
            domains: widget.domains.clone(),
            mode: widget.mode.clone(),
            bot_fight_mode: widget.bot_fight_mode,
            region: widget.region.clone(),
            off_label: widget.off_label,
        }
    }
}
