//! Comanda Client - checkout client for the order-management backend
//!
//! Implements the checkout pipeline for a restaurant ordering front-end:
//! price a cart snapshot, allocate an order number, then persist the order
//! as a header write followed by strictly sequential item writes. Also
//! provides the order-history read that reconstructs status for orders
//! placed in previous sessions.
//!
//! The backend is reached over HTTP; every write is acknowledged with a
//! free-text message and counts as persisted only when that message signals
//! success. There is no transaction spanning the writes, so failures report
//! exactly which lines were recorded.

pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod pricing;

pub use backend::{HttpBackend, OrderBackend};
pub use checkout::{
    CheckoutContext, CheckoutReceipt, OrderSubmission, OrderTracking, SagaState, SagaStep,
    place_order,
};
pub use config::ClientConfig;
pub use error::{BackendError, BackendResult, CheckoutError, CheckoutResult};
pub use history::{PlacedOrder, fetch_placed_orders};
pub use http::HttpClient;
pub use pricing::{PricingError, PricingResult, compute_totals, default_vat_rate};

// Re-export shared types for convenience
pub use shared::order::{
    CartLine, ClientIdentity, DeliveryStatus, DineInStatus, OrderHeader, OrderKind, OrderLine,
    OrderNumber, PaymentMode, StatusHistory,
};
