//! # CHIP Callback Handling
//!
//! Verification, normalization and dispatch of the payment callbacks CHIP
//! posts to the `success_callback` URL.
//!
//! ```text
//! Received ─▶ Verify ──mismatch──▶ Unauthorized (401)
//!               │
//!               ▼
//!           Normalize ─▶ Dispatch ─▶ Classify ─▶ Processed (200)
//!               └──────────┴── error ──▶ ProcessingFailed (500)
//! ```

use crate::purchase::Purchase;
use async_trait::async_trait;
use chipin_core::{CallbackPayload, ChipError, ChipResult, PaymentStatus};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Header carrying the shared webhook secret
pub const SIGNATURE_HEADER: &str = "X-CHIP-Signature";

/// Application hook invoked with every verified callback.
///
/// Implement this to mark orders paid, send emails, etc. Returning an error
/// makes the callback route answer 500 so CHIP delivers it again.
#[async_trait]
pub trait PaymentCallbackHandler: Send + Sync {
    async fn handle_payment_callback(&self, payload: &CallbackPayload) -> ChipResult<()>;

    /// Name used in log lines
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Type alias for a shared callback handler (dynamic dispatch)
pub type BoxedCallbackHandler = Arc<dyn PaymentCallbackHandler>;

/// Shared-secret check for inbound callbacks.
#[derive(Clone)]
pub enum WebhookVerifier {
    /// Header must match the configured secret
    Enforced { secret_digest: [u8; 32] },
    /// No secret configured: every callback is accepted unauthenticated
    Disabled,
}

impl WebhookVerifier {
    /// Build from the configured secret. A missing or blank secret disables
    /// verification and is logged as a warning.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => WebhookVerifier::Enforced {
                secret_digest: digest(secret),
            },
            None => {
                warn!(
                    "CHIP webhook verification DISABLED: CHIPIN_WEBHOOK_SECRET is not set, \
                     callbacks will be accepted without authentication"
                );
                WebhookVerifier::Disabled
            }
        }
    }

    pub fn is_enforced(&self) -> bool {
        matches!(self, WebhookVerifier::Enforced { .. })
    }

    /// Check the value of the signature header.
    pub fn verify(&self, signature: Option<&str>) -> ChipResult<()> {
        match self {
            WebhookVerifier::Enforced { secret_digest } => {
                let provided = signature.unwrap_or_default();
                if constant_time_eq(secret_digest, &digest(provided)) {
                    Ok(())
                } else {
                    Err(ChipError::WebhookUnauthorized(format!(
                        "{} header missing or invalid",
                        SIGNATURE_HEADER
                    )))
                }
            }
            WebhookVerifier::Disabled => {
                warn!("Accepting unverified CHIP callback (no webhook secret configured)");
                Ok(())
            }
        }
    }
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookVerifier::Enforced { .. } => f.write_str("WebhookVerifier::Enforced"),
            WebhookVerifier::Disabled => f.write_str("WebhookVerifier::Disabled"),
        }
    }
}

/// Runs one inbound callback through verify, normalize, dispatch and
/// classify.
#[derive(Clone)]
pub struct CallbackProcessor {
    purchase: Purchase,
    verifier: WebhookVerifier,
    handler: Option<BoxedCallbackHandler>,
}

impl CallbackProcessor {
    pub fn new(purchase: Purchase, verifier: WebhookVerifier) -> Self {
        Self {
            purchase,
            verifier,
            handler: None,
        }
    }

    /// Builder: register the application callback handler
    pub fn with_handler(mut self, handler: BoxedCallbackHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn verifier(&self) -> &WebhookVerifier {
        &self.verifier
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Process a callback.
    ///
    /// Returns `ChipError::WebhookUnauthorized` when verification fails; the
    /// handler is not called in that case. Any other error means the
    /// callback was authentic but could not be processed.
    #[instrument(skip(self, signature, body), fields(bytes = body.len()))]
    pub async fn process(&self, signature: Option<&str>, body: &[u8]) -> ChipResult<CallbackPayload> {
        info!("CHIP callback received");
        debug!("CHIP callback body: {}", String::from_utf8_lossy(body));

        if let Err(e) = self.verifier.verify(signature) {
            warn!("CHIP callback verification failed");
            return Err(e);
        }

        let raw = parse_body(body)?;
        let payload = self.purchase.handle_callback(raw);

        self.dispatch(&payload).await?;
        log_status(&payload);

        Ok(payload)
    }

    async fn dispatch(&self, payload: &CallbackPayload) -> ChipResult<()> {
        let Some(handler) = &self.handler else {
            warn!("No CHIP callback handler configured");
            return Ok(());
        };

        handler
            .handle_payment_callback(payload)
            .await
            .map_err(|e| ChipError::Handler(e.to_string()))?;

        info!("Callback handled by {}", handler.name());
        Ok(())
    }
}

impl fmt::Debug for CallbackProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackProcessor")
            .field("verifier", &self.verifier)
            .field("handler", &self.handler.as_ref().map(|h| h.name().to_string()))
            .finish()
    }
}

fn parse_body(body: &[u8]) -> ChipResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ChipError::WebhookParse(
            "callback body is not a JSON object".to_string(),
        )),
        Err(e) => Err(ChipError::WebhookParse(format!(
            "Failed to parse callback body: {}",
            e
        ))),
    }
}

/// Log the payment outcome. Has no effect on the response.
fn log_status(payload: &CallbackPayload) {
    let id = payload.id_or_unknown();
    match &payload.status {
        Some(PaymentStatus::Paid) => info!("Payment successful for ID: {}", id),
        Some(status) if status.is_unsuccessful() => {
            warn!("Payment {} for ID: {}", status, id)
        }
        Some(status) => info!("Payment callback received with status: {}", status),
        None => info!("Payment callback received without status for ID: {}", id),
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

// Inputs are fixed-size digests, so neither content nor length of the
// provided header shows up in timing.
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
