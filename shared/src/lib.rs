//! Shared types for the Comanda checkout core
//!
//! Domain types used by both the checkout client and front-ends:
//! cart lines, order header/line payloads, and the order status model.

pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Order re-exports (for convenient access)
pub use order::{
    CartLine, ClientIdentity, DeliveryStatus, DineInStatus, OrderHeader, OrderKind, OrderLine,
    OrderNumber, PaymentMode, StatusHistory, StatusHistoryEntry, StatusVocabulary,
};
