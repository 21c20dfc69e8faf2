//! # Purchase Types
//!
//! Request and response bodies for the CHIP `purchases/` endpoint.
//! Both stay as JSON objects so fields this crate does not model still
//! reach the gateway and the caller.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Body of a purchase creation request.
///
/// Keys map directly to CHIP purchase fields. Builder helpers cover the
/// common ones; anything else goes through [`PurchaseRequest::with`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseRequest(Map<String, Value>);

impl PurchaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set an arbitrary field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Builder: customer email (`client.email`)
    pub fn with_client_email(mut self, email: impl Into<String>) -> Self {
        let email = Value::String(email.into());
        self.update_object("client", |client| {
            client.insert("email".to_string(), email);
        });
        self
    }

    /// Builder: append a product line (`purchase.products[]`).
    /// `price` is in the currency's minor unit.
    pub fn with_product(mut self, name: impl Into<String>, price: i64) -> Self {
        let line = json!({ "name": name.into(), "price": price });
        self.update_object("purchase", |purchase| {
            let products = purchase.entry("products").or_insert_with(|| json!([]));
            if let Value::Array(products) = products {
                products.push(line);
            }
        });
        self
    }

    /// Builder: purchase currency (`purchase.currency`)
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        let currency = Value::String(currency.into());
        self.update_object("purchase", |purchase| {
            purchase.insert("currency".to_string(), currency);
        });
        self
    }

    /// Builder: merchant reference echoed back in callbacks
    pub fn with_reference(self, reference: impl Into<String>) -> Self {
        self.with("reference", reference.into())
    }

    pub fn with_brand_id(self, brand_id: impl Into<String>) -> Self {
        self.with("brand_id", brand_id.into())
    }

    /// Builder: customer redirect targets after payment
    pub fn with_redirects(self, success: impl Into<String>, failure: impl Into<String>) -> Self {
        self.with("success_redirect", success.into())
            .with("failure_redirect", failure.into())
    }

    /// Fill `defaults` in without touching keys the caller already set.
    pub fn merge_defaults(&mut self, defaults: Map<String, Value>) {
        for (key, value) in defaults {
            self.0.entry(key).or_insert(value);
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Apply `update` to the nested object at `key`, replacing any non-object
    /// value already there.
    fn update_object<F>(&mut self, key: &str, update: F)
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let field = self
            .0
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !field.is_object() {
            *field = Value::Object(Map::new());
        }
        if let Value::Object(map) = field {
            update(map);
        }
    }
}

impl From<Map<String, Value>> for PurchaseRequest {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Raw purchase object returned by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseResponse(Map<String, Value>);

impl PurchaseResponse {
    /// Purchase ID assigned by CHIP
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Current purchase status (`created`, `paid`, ...)
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// Hosted payment page, `None` when absent or empty
    pub fn checkout_url(&self) -> Option<&str> {
        self.str_field("checkout_url").filter(|url| !url.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }
}

impl From<Map<String, Value>> for PurchaseResponse {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shapes_chip_body() {
        let request = PurchaseRequest::new()
            .with_client_email("buyer@example.com")
            .with_currency("MYR")
            .with_product("Hoodie", 12900)
            .with_product("Cap", 4500)
            .with_reference("ord_1");

        let body = Value::Object(request.into_inner());
        assert_eq!(body["client"]["email"], "buyer@example.com");
        assert_eq!(body["purchase"]["currency"], "MYR");
        assert_eq!(body["purchase"]["products"][1]["name"], "Cap");
        assert_eq!(body["purchase"]["products"][0]["price"], 12900);
        assert_eq!(body["reference"], "ord_1");
    }

    #[test]
    fn test_merge_defaults_keeps_caller_values() {
        let mut request = PurchaseRequest::new()
            .with_brand_id("caller-brand")
            .with("send_receipt", true);

        let mut defaults = Map::new();
        defaults.insert("brand_id".into(), json!("configured-brand"));
        defaults.insert("send_receipt".into(), json!(false));
        defaults.insert("skip_capture".into(), json!(false));
        request.merge_defaults(defaults);

        assert_eq!(request.get("brand_id"), Some(&json!("caller-brand")));
        assert_eq!(request.get("send_receipt"), Some(&json!(true)));
        assert_eq!(request.get("skip_capture"), Some(&json!(false)));
    }

    #[test]
    fn test_builder_replaces_non_object_section() {
        let request = PurchaseRequest::new()
            .with("client", "not-an-object")
            .with("purchase", json!([1, 2]))
            .with_client_email("buyer@example.com")
            .with_currency("MYR");

        assert_eq!(
            request.get("client"),
            Some(&json!({ "email": "buyer@example.com" }))
        );
        assert_eq!(request.get("purchase"), Some(&json!({ "currency": "MYR" })));
    }

    #[test]
    fn test_response_accessors() {
        let response: PurchaseResponse = serde_json::from_value(json!({
            "id": "pur_1",
            "status": "created",
            "checkout_url": "https://gate.chip-in.asia/p/pur_1/"
        }))
        .unwrap();

        assert_eq!(response.id(), Some("pur_1"));
        assert_eq!(response.status(), Some("created"));
        assert_eq!(
            response.checkout_url(),
            Some("https://gate.chip-in.asia/p/pur_1/")
        );
    }

    #[test]
    fn test_empty_checkout_url_is_none() {
        let response: PurchaseResponse =
            serde_json::from_value(json!({ "id": "pur_1", "checkout_url": "" })).unwrap();
        assert_eq!(response.checkout_url(), None);
    }
}
