//! # Request Handlers
//!
//! Axum request handlers for the CHIP routes: result pages, the payment
//! callback webhook and checkout creation.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Json,
};
use chipin_client::SIGNATURE_HEADER;
use chipin_core::{CallbackPayload, ChipError, PurchaseRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Checkout request accepted from the storefront.
///
/// Only customer-facing fields are taken from the browser. Brand ID, callback
/// URL, redirects and flags always come from server configuration; any other
/// field in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub email: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    pub products: Vec<CheckoutProduct>,
}

/// Product line, price in the currency's minor unit
#[derive(Debug, Deserialize)]
pub struct CheckoutProduct {
    pub name: String,
    pub price: i64,
}

impl CheckoutRequest {
    fn validate(&self) -> Result<(), ChipError> {
        if self.email.trim().is_empty() {
            return Err(ChipError::InvalidRequest("email is required".to_string()));
        }
        if self.products.is_empty() {
            return Err(ChipError::InvalidRequest(
                "at least one product is required".to_string(),
            ));
        }
        if let Some(product) = self.products.iter().find(|p| p.price <= 0) {
            return Err(ChipError::InvalidRequest(format!(
                "price must be positive for product {}",
                product.name
            )));
        }
        Ok(())
    }

    /// Purchase body without any server-controlled field; `Purchase::create`
    /// fills those from configuration.
    fn into_purchase_request(self) -> PurchaseRequest {
        let mut request = PurchaseRequest::new().with_client_email(self.email);
        if let Some(currency) = self.currency {
            request = request.with_currency(currency);
        }
        if let Some(reference) = self.reference {
            request = request.with_reference(reference);
        }
        self.products
            .into_iter()
            .fold(request, |request, p| request.with_product(p.name, p.price))
    }
}

/// Acknowledgement returned to CHIP for a processed callback
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub message: &'static str,
    pub data: CallbackPayload,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn chip_error_to_response(err: ChipError) -> ErrorReply {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let Some(payload) = err.as_api_error().and_then(|api| api.payload()) {
        response = response.with_details(payload.to_string());
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "chipin-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.gateway_mode().as_str(),
        "webhook_verification": state.callbacks.verifier().is_enforced(),
    }))
}

/// Create a purchase and redirect the customer to the CHIP checkout page
#[instrument(skip(state, request))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Redirect, ErrorReply> {
    request.validate().map_err(chip_error_to_response)?;

    let checkout_url = state
        .purchase
        .create_and_redirect(request.into_purchase_request())
        .await
        .map_err(|e| {
            error!("Failed to create CHIP purchase: {}", e.detailed_message());
            chip_error_to_response(e)
        })?;

    info!("Redirecting customer to CHIP checkout: {}", checkout_url);
    Ok(Redirect::to(&checkout_url))
}

/// Handle the CHIP payment callback
#[instrument(skip(state, headers, body))]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallbackAck>, ErrorReply> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.callbacks.process(signature, &body).await {
        Ok(data) => Ok(Json(CallbackAck {
            message: "Callback processed successfully",
            data,
        })),
        Err(ChipError::WebhookUnauthorized(reason)) => {
            warn!("Rejected CHIP callback: {}", reason);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Unauthorized", 401)),
            ))
        }
        Err(e) => {
            error!("Error processing CHIP callback: {}", e.detailed_message());
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Callback processing failed", 500)),
            ))
        }
    }
}

/// Payment success page
pub async fn success(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let reference = params
        .get("reference")
        .or_else(|| params.get("id"))
        .map(|s| html_escape(s))
        .unwrap_or_else(|| "unknown".to_string());

    Html(format!(r#"
<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">✅</div>
        <h1>Payment Successful!</h1>
        <p>Reference: <code>{}</code></p>
        <p style="color: #666;">Your payment was processed successfully.</p>
    </div>
</body>
</html>
"#, reference))
}

/// Payment failed page
pub async fn failed() -> impl IntoResponse {
    Html(r#"
<!DOCTYPE html>
<html>
<head><title>Payment Failed</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">❌</div>
        <h1>Payment Failed</h1>
        <p style="color: #666;">The payment was not completed. No charges were made.</p>
    </div>
</body>
</html>
"#)
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
