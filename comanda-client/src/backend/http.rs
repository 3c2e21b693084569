//! HTTP implementation of the order backend

use async_trait::async_trait;
use shared::order::OrderNumber;

use super::OrderBackend;
use super::types::{
    NextNumberResponse, OrderHistoryRecord, SaveAck, SaveOrderHeaderRequest, SaveOrderLineRequest,
};
use crate::{BackendError, BackendResult, ClientConfig, HttpClient};

// ========== Endpoint paths ==========

const NEXT_NUMBER_PATH: &str = "api/orders/next-number";
const SAVE_HEADER_PATH: &str = "api/orders/header";
const SAVE_ITEM_PATH: &str = "api/orders/items";
const HISTORY_PATH: &str = "api/orders/history";

/// Order backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
}

impl HttpBackend {
    /// Create a backend client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.http = self.http.with_token(token);
        self
    }
}

/// Turn a write acknowledgement into a result
fn ensure_saved(ack: SaveAck) -> BackendResult<()> {
    if ack.indicates_success() {
        Ok(())
    } else {
        Err(BackendError::Backend(ack.message))
    }
}

#[async_trait]
impl OrderBackend for HttpBackend {
    async fn next_order_number(&self) -> BackendResult<OrderNumber> {
        let response: NextNumberResponse = self.http.get(NEXT_NUMBER_PATH).await?;
        response.order_number().ok_or_else(|| {
            BackendError::InvalidResponse("Numbering endpoint returned no order number".to_string())
        })
    }

    async fn save_order_header(&self, request: &SaveOrderHeaderRequest) -> BackendResult<()> {
        let ack: SaveAck = self.http.post(SAVE_HEADER_PATH, request).await?;
        ensure_saved(ack)
    }

    async fn save_order_line(&self, line: &SaveOrderLineRequest) -> BackendResult<()> {
        let ack: SaveAck = self.http.post(SAVE_ITEM_PATH, line).await?;
        ensure_saved(ack)
    }

    async fn order_history(&self, client_id: &str) -> BackendResult<Vec<OrderHistoryRecord>> {
        self.http
            .get_with_query(HISTORY_PATH, &[("client_id", client_id)])
            .await
    }
}
