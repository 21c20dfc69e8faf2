//! HTTP contract tests against a mocked CHIP API.

use chipin_client::{ChipClient, GatewayConfig, Purchase};
use chipin_core::{ChipError, ChipInUrls, PurchaseRequest};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GatewayConfig {
    GatewayConfig::new("key_test")
        .with_base_url(format!("{}/api/v1", server.uri()))
        .with_brand_id("brand_cfg")
}

fn purchase(server: &MockServer) -> Purchase {
    Purchase::new(
        ChipClient::new(config(server)).unwrap(),
        ChipInUrls::new("https://shop.example.com", "/chipin"),
    )
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn post_sends_bearer_token_and_brand_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases/"))
        .and(header("Authorization", "Bearer key_test"))
        .and(body_partial_json(json!({ "brand_id": "brand_cfg", "reference": "r1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "pur_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChipClient::new(config(&server)).unwrap();
    let body = client
        .post("purchases/", object(json!({ "reference": "r1" })))
        .await
        .unwrap();

    assert_eq!(body["id"], "pur_1");
}

#[tokio::test]
async fn get_uses_same_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/purchases/pur_1/"))
        .and(header("Authorization", "Bearer key_test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "pur_1", "status": "paid" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ChipClient::new(config(&server)).unwrap();
    let body = client.get("/purchases/pur_1/").await.unwrap();

    assert_eq!(body["status"], "paid");
}

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "invalid" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/purchases/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = ChipClient::new(config(&server)).unwrap();

    let err = client.post("purchases/", Map::new()).await.unwrap_err();
    let api = err.as_api_error().expect("api error");
    assert_eq!(api.status_code(), Some(422));
    assert_eq!(api.payload(), Some(&json!({ "error": "invalid" })));
    assert!(api.message().contains("invalid"));
    assert!(err.detailed_message().contains("HTTP status: 422"));

    let err = client.get("purchases/missing/").await.unwrap_err();
    let api = err.as_api_error().expect("api error");
    assert_eq!(api.status_code(), Some(404));
    assert_eq!(api.payload(), Some(&json!("not found")));
}

#[tokio::test]
async fn non_object_success_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/purchases/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;

    let client = ChipClient::new(config(&server)).unwrap();
    let err = client.get("purchases/").await.unwrap_err();

    assert!(matches!(err, ChipError::Serialization(_)));
}

#[tokio::test]
async fn empty_success_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/purchases/pur_1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChipClient::new(config(&server)).unwrap();
    let body = client.get("purchases/pur_1/").await.unwrap();

    assert!(body.is_empty());
}

#[tokio::test]
async fn create_injects_configured_brand_and_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases/"))
        .and(body_partial_json(json!({
            "brand_id": "brand_cfg",
            "send_receipt": false,
            "skip_capture": false,
            "force_recurring": false,
            "success_callback": "https://shop.example.com/chipin/callback",
            "success_redirect": "https://shop.example.com/chipin/success",
            "failure_redirect": "https://shop.example.com/chipin/failed",
            "client": { "email": "buyer@example.com" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pur_1",
            "status": "created",
            "checkout_url": "https://gate.chip-in.asia/p/pur_1/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = purchase(&server)
        .create(PurchaseRequest::new().with_client_email("buyer@example.com"))
        .await
        .unwrap();

    assert_eq!(response.id(), Some("pur_1"));
    assert_eq!(response.status(), Some("created"));
}

#[tokio::test]
async fn create_keeps_caller_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases/"))
        .and(body_partial_json(json!({
            "brand_id": "brand_caller",
            "send_receipt": true,
            "success_callback": "https://hooks.example.com/chip"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "pur_2" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = PurchaseRequest::new()
        .with_brand_id("brand_caller")
        .with("send_receipt", true)
        .with("success_callback", "https://hooks.example.com/chip");

    let response = purchase(&server).create(request).await.unwrap();
    assert_eq!(response.id(), Some("pur_2"));
}

#[tokio::test]
async fn create_and_redirect_returns_checkout_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/purchases/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pur_3",
            "checkout_url": "https://gate.chip-in.asia/p/pur_3/"
        })))
        .mount(&server)
        .await;

    let url = purchase(&server)
        .create_and_redirect(PurchaseRequest::new())
        .await
        .unwrap();

    assert_eq!(url, "https://gate.chip-in.asia/p/pur_3/");
}

#[tokio::test]
async fn create_and_redirect_requires_checkout_url() {
    for body in [json!({ "id": "pur_4" }), json!({ "id": "pur_4", "checkout_url": "" })] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/purchases/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(body))
            .mount(&server)
            .await;

        let err = purchase(&server)
            .create_and_redirect(PurchaseRequest::new())
            .await
            .unwrap_err();

        let api = err.as_api_error().expect("api error");
        assert!(api.message().contains("did not return a checkout_url"));
        assert_eq!(api.status_code(), None);
    }
}

#[tokio::test]
async fn retrieve_fetches_purchase_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/purchases/pur_5/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "pur_5", "status": "paid" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = purchase(&server).retrieve("pur_5").await.unwrap();
    assert_eq!(response.status(), Some("paid"));
}
