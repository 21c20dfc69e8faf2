//! # CHIP HTTP Client
//!
//! Authenticated JSON calls against the CHIP REST API.
//! Failures are reported once; nothing here retries, since purchase
//! creation is not idempotent on the gateway side.

use crate::config::GatewayConfig;
use chipin_core::{ApiError, ChipError, ChipResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Thin client over the CHIP API.
///
/// Cheap to clone: the configuration is shared and `reqwest::Client` is
/// reference counted internally.
#[derive(Debug, Clone)]
pub struct ChipClient {
    config: Arc<GatewayConfig>,
    client: Client,
}

impl ChipClient {
    /// Create a new client. Fails only if the TLS backend cannot initialize.
    pub fn new(config: GatewayConfig) -> ChipResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ChipError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> ChipResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// POST `data` to `endpoint`, adding the configured brand ID when the
    /// caller did not set one.
    #[instrument(skip(self, data))]
    pub async fn post(
        &self,
        endpoint: &str,
        mut data: Map<String, Value>,
    ) -> ChipResult<Map<String, Value>> {
        if let Some(brand_id) = &self.config.brand_id {
            data.entry("brand_id")
                .or_insert_with(|| Value::String(brand_id.clone()));
        }

        let url = self.config.endpoint_url(endpoint);
        debug!("CHIP request: POST {} ({} fields)", url, data.len());

        let request = self.authorized(self.client.post(&url)).json(&data);
        self.send(request, "POST", &url).await
    }

    /// GET `endpoint`
    #[instrument(skip(self))]
    pub async fn get(&self, endpoint: &str) -> ChipResult<Map<String, Value>> {
        let url = self.config.endpoint_url(endpoint);
        debug!("CHIP request: GET {}", url);

        let request = self.authorized(self.client.get(&url));
        self.send(request, "GET", &url).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::AUTHORIZATION, self.config.auth_header())
            .header(header::ACCEPT, "application/json")
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> ChipResult<Map<String, Value>> {
        let response = request.send().await.map_err(|e| {
            error!("CHIP request failed: {} {}: {}", method, url, e);
            ChipError::Network(e.to_string())
        })?;

        let status = response.status();
        info!("CHIP response: {} {} -> {}", method, url, status);

        parse_response(response).await
    }
}

/// Turn a gateway response into a JSON object or an `ApiError`.
async fn parse_response(response: Response) -> ChipResult<Map<String, Value>> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ChipError::Network(e.to_string()))?;

    if !status.is_success() {
        let payload = serde_json::from_str::<Value>(&body)
            .unwrap_or_else(|_| Value::String(body.clone()));
        let err = ApiError::new(
            format!("CHIP API error: {}", body),
            Some(status.as_u16()),
            Some(payload),
        );
        error!("{}", err.detailed_message());
        return Err(err.into());
    }

    // 204 and other bodiless successes carry no fields
    if body.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ChipError::Serialization(format!(
            "Expected a JSON object from CHIP, got: {}",
            other
        ))),
        Err(e) => Err(ChipError::Serialization(format!(
            "Failed to parse CHIP response: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_shares_config() {
        let client = ChipClient::new(GatewayConfig::new("key_abc").with_brand_id("brand_1")).unwrap();
        let cloned = client.clone();

        assert!(Arc::ptr_eq(&client.config, &cloned.config));
        assert_eq!(cloned.config().brand_id.as_deref(), Some("brand_1"));
    }
}
