//! Order domain types
//!
//! This module provides the types exchanged around a checkout:
//! - Types: cart lines, identities, order header/line payloads
//! - Status: the two fulfillment vocabularies and the status history log

pub mod status;
pub mod types;

// Re-exports
pub use status::{
    DeliveryStatus, DineInStatus, StatusHistory, StatusHistoryEntry, StatusVocabulary,
    progress_fraction,
};
pub use types::{
    CartLine, ClientIdentity, OrderHeader, OrderKind, OrderLine, OrderNumber, PaymentMode,
};
