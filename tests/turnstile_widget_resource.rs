//! Lifecycle tests for `cloudflare_turnstile_widget` against a mocked API
//!
//! These tests drive the resource through the provider the same way the CLI
//! does and check both the requests sent and the state written back.

use cfprov::cloudflare::auth::Credentials;
use cfprov::cloudflare::client::CloudflareClient;
use cfprov::framework::resource::{
    CreateRequest, DeleteRequest, ImportStateRequest, ImportStateResponse, ReadRequest,
    UpdateRequest,
};
use cfprov::framework::{Resource, State};
use cfprov::service::turnstile::TurnstileWidgetModel;
use cfprov::Provider;
use serde_json::{json, Value};
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT: &str = "f037e56e89293a057740de681ac9abbe";

fn envelope(result: Value) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result
    })
}

fn failure(code: u32, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{"code": code, "message": message}],
        "messages": [],
        "result": null
    })
}

fn widget_json(site_key: &str, name: &str, domains: &[&str]) -> Value {
    json!({
        "sitekey": site_key,
        "secret": "0x4AAF00AAAABn0R22HWm098HVBjhdsYUc",
        "created_on": "2024-01-01T00:00:00Z",
        "modified_on": "2024-01-01T00:00:00Z",
        "name": name,
        "domains": domains,
        "mode": "invisible",
        "bot_fight_mode": false,
        "region": "world",
        "offlabel": false
    })
}

fn random_name() -> String {
    format!("tf-test-{}", uuid::Uuid::new_v4().simple())
}

fn resource_for(server: &MockServer) -> Box<dyn Resource> {
    let client =
        CloudflareClient::with_base_url(Credentials::Token("test-token".to_string()), &server.uri())
            .expect("client should build");
    Provider::with_client(client)
        .resource("cloudflare_turnstile_widget")
        .expect("resource should resolve")
}

#[tokio::test]
async fn test_create_writes_server_assigned_fields() {
    let server = MockServer::start().await;
    let name = random_name();

    Mock::given(method("POST"))
        .and(path(format!("/accounts/{}/challenges/widgets", ACCOUNT)))
        .and(bearer_token("test-token"))
        .and(body_json(json!({
            "name": name,
            "domains": ["example.com"],
            "mode": "invisible",
            "bot_fight_mode": false,
            "region": "world",
            "offlabel": false
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(widget_json("0x4AAF00AAAABn0R22HWm-YU", &name, &["example.com"]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let plan = State::from_json(json!({
        "account_id": ACCOUNT,
        "name": name,
        "domains": ["example.com"],
        "mode": "invisible",
        "region": "world",
        "bot_fight_mode": false,
        "offlabel": false
    }));

    let resp = resource_for(&server).create(CreateRequest { plan }).await;

    assert!(!resp.diagnostics.has_error(), "{:?}", resp.diagnostics);
    let model: TurnstileWidgetModel = resp.state.get().unwrap();
    assert_eq!(model.account_id.value_str(), ACCOUNT);
    assert_eq!(model.id.value_str(), "0x4AAF00AAAABn0R22HWm-YU");
    assert_eq!(model.secret.value_str(), "0x4AAF00AAAABn0R22HWm098HVBjhdsYUc");
    assert_eq!(model.name.value_str(), name);
}

#[tokio::test]
async fn test_create_failure_leaves_no_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/accounts/{}/challenges/widgets", ACCOUNT)))
        .respond_with(ResponseTemplate::new(400).set_body_json(failure(10001, "invalid domain")))
        .mount(&server)
        .await;

    let plan = State::from_json(json!({
        "account_id": ACCOUNT,
        "name": random_name(),
        "domains": ["not a domain"],
        "mode": "managed"
    }));

    let resp = resource_for(&server).create(CreateRequest { plan }).await;

    assert!(resp.diagnostics.has_error());
    assert!(resp.state.is_empty());
    let diag = resp.diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Error creating challenge widget");
    assert!(diag.detail.contains("invalid domain"), "{}", diag.detail);
}

#[tokio::test]
async fn test_create_reports_unsuccessful_2xx() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/accounts/{}/challenges/widgets", ACCOUNT)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(failure(10004, "widget quota exceeded")),
        )
        .mount(&server)
        .await;

    let plan = State::from_json(json!({
        "account_id": ACCOUNT,
        "name": random_name(),
        "domains": ["example.com"],
        "mode": "managed"
    }));

    let resp = resource_for(&server).create(CreateRequest { plan }).await;

    assert!(resp.state.is_empty());
    let diag = resp.diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Error creating challenge widget");
    assert!(diag.detail.contains("unsuccessful"), "{}", diag.detail);
    assert!(diag.detail.contains("widget quota exceeded"), "{}", diag.detail);
}

#[tokio::test]
async fn test_read_without_result_keeps_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-2", ACCOUNT)))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    for site_key in ["site-1", "site-2"] {
        let state_json = json!({"account_id": ACCOUNT, "id": site_key, "name": "w"});
        let resp = resource
            .read(ReadRequest {
                state: State::from_json(state_json.clone()),
            })
            .await;

        let diag = resp.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "Error reading challenge widget");
        assert!(diag.detail.contains("did not contain a result"), "{}", diag.detail);
        assert_eq!(resp.state.into_json(), state_json);
    }
}

#[tokio::test]
async fn test_read_refreshes_drifted_fields() {
    let server = MockServer::start().await;
    let name = random_name();

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(widget_json("site-1", &name, &["a.com", "b.com"]))),
        )
        .mount(&server)
        .await;

    let state = State::from_json(json!({
        "account_id": ACCOUNT,
        "id": "site-1",
        "name": "stale",
        "domains": ["a.com"]
    }));

    let resp = resource_for(&server).read(ReadRequest { state }).await;

    assert!(!resp.diagnostics.has_error(), "{:?}", resp.diagnostics);
    let model: TurnstileWidgetModel = resp.state.get().unwrap();
    assert_eq!(model.name.value_str(), name);
    assert_eq!(
        model.domains.as_known().unwrap().iter().cloned().collect::<Vec<_>>(),
        vec!["a.com".to_string(), "b.com".to_string()]
    );
}

#[tokio::test]
async fn test_update_addresses_widget_by_prior_site_key() {
    let server = MockServer::start().await;
    let name = random_name();

    Mock::given(method("PUT"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .and(body_json(json!({
            "name": name,
            "domains": ["example.com", "example.net"],
            "mode": "managed",
            "bot_fight_mode": true,
            "offlabel": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "sitekey": "site-1",
            "secret": "s",
            "name": name,
            "domains": ["example.com", "example.net"],
            "mode": "managed",
            "bot_fight_mode": true,
            "region": "world",
            "offlabel": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let prior = State::from_json(json!({
        "account_id": ACCOUNT,
        "id": "site-1",
        "secret": "s",
        "name": "old",
        "domains": ["example.com"],
        "mode": "invisible"
    }));
    let plan = State::from_json(json!({
        "account_id": ACCOUNT,
        "name": name,
        "domains": ["example.net", "example.com"],
        "mode": "managed",
        "bot_fight_mode": true
    }));

    let resp = resource_for(&server)
        .update(UpdateRequest { plan, state: prior })
        .await;

    assert!(!resp.diagnostics.has_error(), "{:?}", resp.diagnostics);
    let model: TurnstileWidgetModel = resp.state.get().unwrap();
    assert_eq!(model.id.value_str(), "site-1");
    assert_eq!(model.mode.value_str(), "managed");
    assert!(model.bot_fight_mode.value_bool());
}

#[tokio::test]
async fn test_update_failure_keeps_prior_state() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let prior_json = json!({
        "account_id": ACCOUNT,
        "id": "site-1",
        "name": "old",
        "domains": ["example.com"],
        "mode": "invisible"
    });
    let plan = State::from_json(json!({
        "account_id": ACCOUNT,
        "id": "site-1",
        "name": "new",
        "domains": ["example.com"],
        "mode": "invisible"
    }));

    let resp = resource_for(&server)
        .update(UpdateRequest {
            plan,
            state: State::from_json(prior_json.clone()),
        })
        .await;

    assert!(resp.diagnostics.has_error());
    assert_eq!(
        resp.diagnostics.errors().next().unwrap().summary,
        "Error updating challenge widget"
    );
    assert_eq!(resp.state.into_json(), prior_json);
}

#[tokio::test]
async fn test_delete_then_read_reports_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(widget_json("site-1", "w", &[]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}/challenges/widgets/site-1", ACCOUNT)))
        .respond_with(ResponseTemplate::new(404).set_body_json(failure(10007, "not_found")))
        .mount(&server)
        .await;

    let state_json = json!({"account_id": ACCOUNT, "id": "site-1"});
    let resource = resource_for(&server);

    let deleted = resource
        .delete(DeleteRequest {
            state: State::from_json(state_json.clone()),
        })
        .await;
    assert!(!deleted.diagnostics.has_error(), "{:?}", deleted.diagnostics);
    assert!(deleted.state.is_empty());

    let read = resource
        .read(ReadRequest {
            state: State::from_json(state_json.clone()),
        })
        .await;
    assert!(read.diagnostics.has_error());
    let diag = read.diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Error reading challenge widget");
    assert!(diag.detail.contains("404"), "{}", diag.detail);
    // The caller decides whether to drop it; the handler leaves state alone.
    assert_eq!(read.state.into_json(), state_json);
}

#[tokio::test]
async fn test_import_needs_no_api_call() {
    let server = MockServer::start().await;
    let resource = resource_for(&server);
    let importable = resource.as_importable().expect("widgets are importable");

    let mut resp = ImportStateResponse::default();
    importable.import_state(
        &ImportStateRequest {
            id: format!("{}/0x4AAF00AAAABn0R22HWm-YU", ACCOUNT),
        },
        &mut resp,
    );

    assert!(!resp.diagnostics.has_error());
    assert_eq!(
        resp.state.into_json(),
        json!({"account_id": ACCOUNT, "id": "0x4AAF00AAAABn0R22HWm-YU"})
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_rejects_malformed_id() {
    let server = MockServer::start().await;
    let resource = resource_for(&server);
    let importable = resource.as_importable().unwrap();

    for id in ["no-slash", "a/b/c"] {
        let mut resp = ImportStateResponse::default();
        importable.import_state(&ImportStateRequest { id: id.to_string() }, &mut resp);
        assert!(resp.diagnostics.has_error(), "{} should be rejected", id);
        assert!(resp.state.is_empty());
    }
}

#[tokio::test]
async fn test_unconfigured_provider_reports_error() {
    let resource = Provider::new().resource("turnstile_widget").unwrap();

    let resp = resource
        .create(CreateRequest {
            plan: State::from_json(json!({"account_id": ACCOUNT, "name": "w", "domains": []})),
        })
        .await;

    assert!(resp.diagnostics.has_error());
    assert!(resp.state.is_empty());
}
