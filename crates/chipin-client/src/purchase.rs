//! # Purchase Endpoint
//!
//! Creating purchases, resolving their checkout URL and normalizing the
//! callbacks CHIP sends back for them.

use crate::client::ChipClient;
use chipin_core::{
    ApiError, CallbackPayload, ChipError, ChipInUrls, ChipResult, PurchaseRequest,
    PurchaseResponse,
};
use serde_json::{Map, Value};
use tracing::{info, instrument};

/// CHIP purchases endpoint path
pub const PURCHASES_ENDPOINT: &str = "purchases/";

/// Purchase endpoint adapter
#[derive(Debug, Clone)]
pub struct Purchase {
    client: ChipClient,
    urls: ChipInUrls,
}

impl Purchase {
    /// `urls` supplies the callback and redirect defaults for new purchases.
    pub fn new(client: ChipClient, urls: ChipInUrls) -> Self {
        Self { client, urls }
    }

    pub fn client(&self) -> &ChipClient {
        &self.client
    }

    pub fn urls(&self) -> &ChipInUrls {
        &self.urls
    }

    /// Fields every purchase starts from. Caller values override them.
    fn defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        if let Some(brand_id) = &self.client.config().brand_id {
            defaults.insert("brand_id".into(), Value::String(brand_id.clone()));
        }
        defaults.insert("send_receipt".into(), Value::Bool(false));
        defaults.insert("skip_capture".into(), Value::Bool(false));
        defaults.insert("force_recurring".into(), Value::Bool(false));
        defaults.insert("success_callback".into(), Value::String(self.urls.callback_url()));
        defaults.insert("success_redirect".into(), Value::String(self.urls.success_url()));
        defaults.insert("failure_redirect".into(), Value::String(self.urls.failed_url()));
        defaults
    }

    /// Create a purchase.
    ///
    /// Fails with `ChipError::Configuration` before any request is sent when
    /// neither the payload nor the configuration provides a brand ID.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, mut payload: PurchaseRequest) -> ChipResult<PurchaseResponse> {
        payload.merge_defaults(self.defaults());

        if !payload.get("brand_id").is_some_and(has_brand_id) {
            return Err(ChipError::Configuration(
                "brand_id missing: set CHIPIN_BRAND_ID or pass brand_id in the purchase".to_string(),
            ));
        }

        let response = PurchaseResponse::from(
            self.client
                .post(PURCHASES_ENDPOINT, payload.into_inner())
                .await?,
        );

        info!(
            "Created CHIP purchase: id={}, status={}",
            response.id().unwrap_or("unknown"),
            response.status().unwrap_or("unknown")
        );

        Ok(response)
    }

    /// Create a purchase and return the hosted checkout URL the customer
    /// should be redirected to.
    pub async fn create_and_redirect(&self, payload: PurchaseRequest) -> ChipResult<String> {
        let response = self.create(payload).await?;

        match response.checkout_url() {
            Some(url) => Ok(url.to_string()),
            None => Err(ApiError::new(
                "CHIP API did not return a checkout_url",
                None,
                Some(Value::Object(response.into_inner())),
            )
            .into()),
        }
    }

    /// Fetch a purchase by ID.
    ///
    /// IDs are placed in the URL path as-is, so only ASCII letters, digits,
    /// `-` and `_` are accepted.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, purchase_id: &str) -> ChipResult<PurchaseResponse> {
        if purchase_id.trim().is_empty() {
            return Err(ChipError::InvalidRequest("purchase id is empty".to_string()));
        }
        if !purchase_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ChipError::InvalidRequest(format!(
                "purchase id contains invalid characters: {:?}",
                purchase_id
            )));
        }

        let endpoint = format!("{}{}/", PURCHASES_ENDPOINT, purchase_id);
        Ok(PurchaseResponse::from(self.client.get(&endpoint).await?))
    }

    /// Normalize an inbound callback body
    pub fn handle_callback(&self, raw: Map<String, Value>) -> CallbackPayload {
        CallbackPayload::from_raw(raw)
    }
}

fn has_brand_id(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Null => false,
        _ => true,
    }
}
