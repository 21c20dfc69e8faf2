//! # Callback Types
//!
//! Normalized view of the purchase object CHIP posts to the callback URL.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Purchase status reported in a callback.
///
/// Unrecognized statuses are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    Failed,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other(status) => status,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    /// Failed or cancelled
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, PaymentStatus::Failed | PaymentStatus::Cancelled)
    }
}

impl From<&str> for PaymentStatus {
    fn from(status: &str) -> Self {
        match status {
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            "cancelled" => PaymentStatus::Cancelled,
            other => PaymentStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "paid" | "failed" | "cancelled" => PaymentStatus::from(status.as_str()),
            _ => PaymentStatus::Other(status),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback body reduced to the fields integrators act on.
///
/// Every field is optional because CHIP may omit any of them; `raw` keeps the
/// complete original object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub id: Option<String>,
    pub status: Option<PaymentStatus>,
    /// `client.email`
    pub email: Option<String>,
    /// `payment.amount` exactly as CHIP sent it (normally an integer in the
    /// currency's minor unit)
    pub amount: Option<Value>,
    pub reference: Option<String>,
    pub checkout_url: Option<String>,
    pub raw: Map<String, Value>,
}

impl CallbackPayload {
    /// Normalize a raw callback object. Pure: the same input always yields
    /// the same payload.
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        let str_field = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(String::from);

        let email = raw
            .get("client")
            .and_then(|c| c.get("email"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let amount = raw
            .get("payment")
            .and_then(|p| p.get("amount"))
            .filter(|v| !v.is_null())
            .cloned();

        Self {
            id: str_field("id"),
            status: str_field("status").map(PaymentStatus::from),
            email,
            amount,
            reference: str_field("reference"),
            checkout_url: str_field("checkout_url"),
            raw,
        }
    }

    /// Purchase ID for log lines
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }
}
