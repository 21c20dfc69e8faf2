//! # chipin-client
//!
//! Client for the CHIP payment gateway.
//!
//! This crate provides:
//!
//! 1. **ChipClient** - bearer-authenticated JSON calls against the CHIP API
//! 2. **Purchase** - purchase creation, checkout URL lookup, callback normalization
//! 3. **CallbackProcessor** - shared-secret verification and dispatch of payment callbacks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chipin_client::{ChipClient, GatewayConfig, Purchase};
//! use chipin_core::{ChipInUrls, PurchaseRequest};
//!
//! let client = ChipClient::new(GatewayConfig::from_env()?)?;
//! let purchase = Purchase::new(client, ChipInUrls::new("https://shop.example.com", "/chipin"));
//!
//! let checkout_url = purchase
//!     .create_and_redirect(
//!         PurchaseRequest::new()
//!             .with_client_email("buyer@example.com")
//!             .with_product("Hoodie", 12900),
//!     )
//!     .await?;
//!
//! // Redirect the customer to checkout_url
//! ```
//!
//! ## Callback Handling
//!
//! ```rust,ignore
//! use chipin_client::{CallbackProcessor, PaymentCallbackHandler, WebhookVerifier};
//!
//! struct MarkOrderPaid;
//!
//! #[async_trait]
//! impl PaymentCallbackHandler for MarkOrderPaid {
//!     async fn handle_payment_callback(&self, payload: &CallbackPayload) -> ChipResult<()> {
//!         // Look up payload.reference and update the order
//!         Ok(())
//!     }
//! }
//!
//! let processor = CallbackProcessor::new(purchase, WebhookVerifier::from_secret(secret))
//!     .with_handler(Arc::new(MarkOrderPaid));
//! let payload = processor.process(signature_header, &body).await?;
//! ```

pub mod client;
pub mod config;
pub mod purchase;
pub mod webhook;

// Re-exports
pub use client::ChipClient;
pub use config::{GatewayConfig, GatewayMode, DEFAULT_BASE_URL};
pub use purchase::{Purchase, PURCHASES_ENDPOINT};
pub use webhook::{
    BoxedCallbackHandler, CallbackProcessor, PaymentCallbackHandler, WebhookVerifier,
    SIGNATURE_HEADER,
};
