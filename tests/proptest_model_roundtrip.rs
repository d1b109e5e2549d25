//! Property-based tests using proptest
//!
//! These tests check that expanding a model to the wire and flattening the
//! API's echo of it gives the model back, for randomized models.

use cfprov::cloudflare::device_posture::{DevicePostureRule, DevicePostureRuleInput};
use cfprov::cloudflare::turnstile::{CreateTurnstileWidgetParams, TurnstileWidget};
use cfprov::framework::types::Value;
use cfprov::framework::Diagnostics;
use cfprov::service::device_posture_rule::{
    build_model_from_rule, build_rule_from_model, DevicePostureRuleInputModel,
    DevicePostureRuleModel,
};
use cfprov::service::turnstile::{
    build_challenge_model_from_widget, build_challenge_widget_from_model, TurnstileWidgetModel,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Generate arbitrary widget models with every field known
fn arb_widget_model() -> impl Strategy<Value = TurnstileWidgetModel> {
    (
        "[0-9a-f]{32}", // account
        "0x4AAAAAAA[A-Za-z0-9_-]{12}", // site key
        "[A-Za-z0-9 ._-]{1,40}", // name
        prop_oneof!["managed", "non-interactive", "invisible"],
        prop::collection::btree_set("[a-z]{1,12}\\.(com|net|org)", 0..5),
        any::<bool>(),
        prop_oneof!["world", "china"],
        any::<bool>(),
    )
        .prop_map(
            |(account, site_key, name, mode, domains, bot_fight_mode, region, offlabel)| {
                TurnstileWidgetModel {
                    account_id: account.as_str().into(),
                    id: site_key.as_str().into(),
                    secret: Value::Null,
                    name: name.as_str().into(),
                    mode: mode.as_str().into(),
                    domains: Value::known(domains),
                    bot_fight_mode: bot_fight_mode.into(),
                    region: region.as_str().into(),
                    offlabel: offlabel.into(),
                }
            },
        )
}

/// What the API sends back for a created widget: the request body plus the
/// server-assigned site key and secret
fn echo_widget(widget: &TurnstileWidget, secret: &str) -> TurnstileWidget {
    let mut body = serde_json::to_value(CreateTurnstileWidgetParams::from(widget)).unwrap();
    body["sitekey"] = serde_json::json!(widget.site_key);
    body["secret"] = serde_json::json!(secret);
    serde_json::from_value(body).unwrap()
}

proptest! {
    #[test]
    fn widget_round_trips_except_secret(
        model in arb_widget_model(),
        secret in "0x4AAAAAAA[A-Za-z0-9_-]{20}",
    ) {
        let widget = build_challenge_widget_from_model(&model);
        prop_assert!(widget.secret.is_empty());

        let echoed = echo_widget(&widget, &secret);
        let flattened = build_challenge_model_from_widget(model.account_id.clone(), echoed);

        prop_assert_eq!(flattened.secret.value_str(), secret.as_str());
        prop_assert_eq!(
            TurnstileWidgetModel { secret: Value::Null, ..flattened },
            model
        );
    }

    #[test]
    fn widget_domains_are_order_insensitive(
        mut domains in prop::collection::vec("[a-z]{1,8}\\.com", 1..6),
    ) {
        let sorted: BTreeSet<String> = domains.iter().cloned().collect();
        domains.reverse();

        let echoed = TurnstileWidget {
            site_key: "k".to_string(),
            domains,
            ..Default::default()
        };
        let model = build_challenge_model_from_widget("acct".into(), echoed);

        prop_assert_eq!(model.domains.as_known(), Some(&sorted));
    }

    #[test]
    fn serial_number_ignores_foreign_input_fields(
        serial in "[A-Z0-9]{4,16}",
        version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        domain in "[a-z]{3,10}\\.com",
    ) {
        let model = DevicePostureRuleModel {
            account_id: "acct".into(),
            name: "serials".into(),
            rule_type: "serial_number".into(),
            input: vec![DevicePostureRuleInputModel {
                id: serial.as_str().into(),
                version: version.as_str().into(),
                domain: domain.as_str().into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let rule = build_rule_from_model(&model).unwrap();
        prop_assert_eq!(rule.input.id.as_deref(), Some(serial.as_str()));
        prop_assert!(rule.input.version.is_none());
        prop_assert!(rule.input.domain.is_none());

        // The API may echo fields that do not apply; they are not read back.
        let echoed = DevicePostureRule {
            id: "rule-1".to_string(),
            input: DevicePostureRuleInput {
                version: Some(version.clone()),
                domain: Some(domain.clone()),
                ..rule.input.clone()
            },
            ..rule
        };
        let mut diagnostics = Diagnostics::new();
        let flattened = build_model_from_rule("acct".into(), echoed, &mut diagnostics);

        prop_assert!(diagnostics.is_empty());
        prop_assert_eq!(flattened.input.len(), 1);
        prop_assert_eq!(flattened.input[0].id.value_str(), serial.as_str());
        prop_assert!(flattened.input[0].version.is_null());
        prop_assert!(flattened.input[0].domain.is_null());
    }
}
