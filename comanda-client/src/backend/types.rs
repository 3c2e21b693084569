//! Wire types for the order-management backend
//!
//! These mirror the deployed backend's endpoints verbatim, including its
//! quirks: the numbering endpoint returns the allocated number inside a
//! free-text `message` field, and write acknowledgements signal persistence
//! through a phrase in `message` rather than through the HTTP status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{OrderHeader, OrderNumber};

/// Phrase a write acknowledgement contains when the record persisted
pub const SAVED_PHRASE: &str = "saved successfully";

/// Header write request.
///
/// `success_status` and `error_status` are sent empty: the endpoint requires
/// the fields to exist but only populates the pair in its response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOrderHeaderRequest {
    #[serde(flatten)]
    pub header: OrderHeader,
    pub success_status: String,
    pub error_status: String,
}

impl SaveOrderHeaderRequest {
    pub fn new(header: OrderHeader) -> Self {
        Self {
            header,
            success_status: String::new(),
            error_status: String::new(),
        }
    }
}

/// Item write request body: the persisted line form, field for field
pub use shared::order::OrderLine as SaveOrderLineRequest;

/// Write acknowledgement.
///
/// A write counts as persisted only when [`SaveAck::indicates_success`]
/// holds: the backend answers HTTP 200 with an error text when a save fails,
/// so the status code alone proves nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAck {
    /// Free-text outcome message
    pub message: String,
    /// Status label the backend echoes on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_status: Option<String>,
    /// Status label the backend echoes on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_status: Option<String>,
}

impl SaveAck {
    /// Whether the message signals a persisted write (case-insensitive
    /// substring match against [`SAVED_PHRASE`])
    pub fn indicates_success(&self) -> bool {
        self.message.to_ascii_lowercase().contains(SAVED_PHRASE)
    }
}

/// Numbering endpoint response: the allocated number rides in `message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextNumberResponse {
    pub message: String,
}

impl NextNumberResponse {
    /// Extract the allocated order number, rejecting blank responses
    pub fn order_number(&self) -> Option<OrderNumber> {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(OrderNumber::new(trimmed))
        }
    }
}

/// One row of the order-history read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryRecord {
    /// Order number
    pub order_no: OrderNumber,
    /// Numeric status code (see `DeliveryStatus::from_backend_code`)
    pub status_code: i64,
    /// Order date as stored by the backend (`YYYY-MM-DD`)
    pub placed_at: String,
    /// Order total including VAT
    pub total_incl_vat: Decimal,
    /// ISO currency code
    #[serde(default)]
    pub currency: String,
}
