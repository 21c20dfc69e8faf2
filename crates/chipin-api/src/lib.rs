//! # chipin-api
//!
//! HTTP routes for the CHIP payment gateway integration.
//!
//! This crate provides:
//! - Axum router with the success, failed and callback routes
//! - A checkout route that creates a purchase and redirects to CHIP
//! - `AppState` wiring an application `PaymentCallbackHandler` into the
//!   callback route
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/chipin/success` | Payment success page |
//! | GET | `/chipin/failed` | Payment failed page |
//! | POST | `/chipin/callback` | CHIP payment callback |
//! | POST | `/chipin/checkout` | Create purchase, 303 to checkout URL |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
