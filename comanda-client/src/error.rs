//! Checkout and backend error types
//!
//! Two layers: `BackendError` covers a single HTTP exchange (transport,
//! status triage, decode, rejected acks); `CheckoutError` covers the
//! checkout pipeline and pins every backend failure to the saga step it
//! happened in, so callers can tell the user exactly what was recorded.

use shared::order::OrderNumber;
use thiserror::Error;

/// Error from a single backend exchange
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response decoded but is missing required data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected as invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend refused the operation; carries its message verbatim
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for backend exchanges
pub type BackendResult<T> = Result<T, BackendError>;

/// Error from the checkout pipeline
///
/// The variants partition the pipeline by how much backend state exists when
/// they occur: `Validation` and `Allocation` leave none, `Replay` writes
/// nothing new, `HeaderPersist` leaves none, `ItemPersist` leaves the header
/// and a prefix of the lines.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The submission for this order number already ran
    ///
    /// Nothing new was written; whatever the first run persisted stays as
    /// is. Retrying means a fresh allocation, never a replay.
    #[error("Order {order_number} submission already ran; retry with a fresh order number")]
    Replay { order_number: OrderNumber },

    /// Order number allocation failed; nothing was written
    #[error("Order number allocation failed: {source}")]
    Allocation {
        #[source]
        source: BackendError,
    },

    /// Header write failed; no item writes were attempted
    #[error("Order {order_number} header was not saved: {source}")]
    HeaderPersist {
        order_number: OrderNumber,
        #[source]
        source: BackendError,
    },

    /// An item write failed part-way through the order
    ///
    /// Lines `1..serial_no` are persisted on the backend, `serial_no..` were
    /// never attempted. Nothing is rolled back.
    #[error(
        "Order {order_number} line {serial_no} of {total} was not saved \
         ({persisted} line(s) persisted): {source}"
    )]
    ItemPersist {
        order_number: OrderNumber,
        serial_no: u32,
        persisted: u32,
        total: u32,
        #[source]
        source: BackendError,
    },
}

/// Result type for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

impl From<crate::pricing::PricingError> for CheckoutError {
    fn from(e: crate::pricing::PricingError) -> Self {
        CheckoutError::Validation(e.to_string())
    }
}
