//! # chipin-core
//!
//! Core types for the CHIP payment gateway integration.
//!
//! This crate provides:
//! - `PurchaseRequest` and `PurchaseResponse` for the `purchases/` endpoint
//! - `CallbackPayload` and `PaymentStatus` for inbound payment callbacks
//! - `ChipInUrls` for the success, failed and callback route URLs
//! - `ChipError` and `ApiError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use chipin_core::PurchaseRequest;
//!
//! let request = PurchaseRequest::new()
//!     .with_client_email("buyer@example.com")
//!     .with_currency("MYR")
//!     .with_product("Hoodie", 12900);
//!
//! // Hand it to chipin_client::Purchase::create_and_redirect
//! // and send the customer to the returned checkout URL
//! ```

pub mod callback;
pub mod error;
pub mod purchase;
pub mod urls;

// Re-exports for convenience
pub use callback::{CallbackPayload, PaymentStatus};
pub use error::{ApiError, ChipError, ChipResult};
pub use purchase::{PurchaseRequest, PurchaseResponse};
pub use urls::ChipInUrls;
