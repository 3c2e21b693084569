//! Order backend gateway
//!
//! `OrderBackend` is the seam between the checkout pipeline and the deployed
//! order-management backend. The saga and the history read only ever talk to
//! this trait; `HttpBackend` is the production implementation, tests drive
//! the pipeline with recording doubles.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{
    NextNumberResponse, OrderHistoryRecord, SaveAck, SaveOrderHeaderRequest, SaveOrderLineRequest,
};

use async_trait::async_trait;
use shared::order::OrderNumber;

use crate::BackendResult;

/// Backend operations the checkout pipeline depends on
///
/// Write methods must return `Ok(())` only for writes the backend actually
/// persisted: an HTTP 2xx whose acknowledgement does not signal success is an
/// error, not a save.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Allocate the next order number from the backend counter.
    ///
    /// Called exactly once per checkout attempt, before any persistence.
    /// Numbers are never reused; a retried checkout allocates a fresh one.
    async fn next_order_number(&self) -> BackendResult<OrderNumber>;

    /// Persist the order header.
    async fn save_order_header(&self, request: &SaveOrderHeaderRequest) -> BackendResult<()>;

    /// Persist a single order line.
    async fn save_order_line(&self, line: &SaveOrderLineRequest) -> BackendResult<()>;

    /// Fetch the order history rows for a client.
    async fn order_history(&self, client_id: &str) -> BackendResult<Vec<OrderHistoryRecord>>;
}
