//! Order history read
//!
//! The only way to reconstruct status for orders placed in previous
//! sessions: fetch the backend's history rows and translate each numeric
//! status code into the delivery vocabulary.

use rust_decimal::Decimal;
use shared::order::{DeliveryStatus, OrderNumber, StatusVocabulary, progress_fraction};

use crate::BackendResult;
use crate::backend::{OrderBackend, OrderHistoryRecord};

/// A previously placed order with its translated status
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// Order number
    pub order_no: OrderNumber,
    /// Order date as stored by the backend (`YYYY-MM-DD`)
    pub placed_at: String,
    /// Order total including VAT
    pub total_incl_vat: Decimal,
    /// ISO currency code
    pub currency: String,
    /// Translated status (`Unknown` for unrecognized codes)
    pub status: DeliveryStatus,
    /// Progress through the delivery vocabulary, `0.0..=1.0`
    pub progress: f64,
}

impl PlacedOrder {
    /// Display label for the status ("In Transit", "Unknown Status", ...)
    pub fn status_label(&self) -> String {
        self.status.to_string()
    }

    /// Vocabulary position of the status, `None` for `Unknown`
    pub fn position(&self) -> Option<usize> {
        self.status.position()
    }
}

impl From<OrderHistoryRecord> for PlacedOrder {
    fn from(record: OrderHistoryRecord) -> Self {
        let status = DeliveryStatus::from_backend_code(record.status_code);
        if status == DeliveryStatus::Unknown {
            tracing::warn!(
                order_no = %record.order_no,
                code = record.status_code,
                "Unrecognized status code, rendering as Unknown Status"
            );
        }
        let progress = progress_fraction(status.position(), DeliveryStatus::LEN);

        Self {
            order_no: record.order_no,
            placed_at: record.placed_at,
            total_incl_vat: record.total_incl_vat,
            currency: record.currency,
            status,
            progress,
        }
    }
}

/// Fetch and translate the order history for a client.
///
/// The backend reports status as a numeric code with delivery-vocabulary
/// meaning only; dine-in orders come back through the same code table.
/// Unrecognized codes degrade to "Unknown Status" instead of failing the
/// whole fetch.
pub async fn fetch_placed_orders<B: OrderBackend + ?Sized>(
    backend: &B,
    client_id: &str,
) -> BackendResult<Vec<PlacedOrder>> {
    let records = backend.order_history(client_id).await?;
    tracing::debug!(client_id, count = records.len(), "Fetched order history");
    Ok(records.into_iter().map(PlacedOrder::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(status_code: i64) -> OrderHistoryRecord {
        OrderHistoryRecord {
            order_no: OrderNumber::new("ORD-11"),
            status_code,
            placed_at: "2026-08-20".to_string(),
            total_incl_vat: Decimal::new(2820, 0),
            currency: "MXN".to_string(),
        }
    }

    #[test]
    fn test_code_two_renders_in_transit() {
        let order = PlacedOrder::from(make_record(2));
        assert_eq!(order.status, DeliveryStatus::InTransit);
        assert_eq!(order.status_label(), "In Transit");
        assert_eq!(order.position(), Some(2));
        assert!((order.progress - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrecognized_code_degrades_without_error() {
        let order = PlacedOrder::from(make_record(9));
        assert_eq!(order.status, DeliveryStatus::Unknown);
        assert_eq!(order.status_label(), "Unknown Status");
        assert_eq!(order.position(), None);
        assert_eq!(order.progress, 0.0);
    }

    #[test]
    fn test_terminal_code_is_full_progress() {
        let order = PlacedOrder::from(make_record(3));
        assert_eq!(order.status, DeliveryStatus::Delivered);
        assert_eq!(order.progress, 1.0);
    }
}
