//! Core order types exchanged around a checkout
//!
//! `CartLine` is the read-only snapshot handed to the pricing engine and the
//! submission saga. `OrderHeader`/`OrderLine` are the persisted forms written
//! to the order backend, one header and one line per cart position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Sequential order identifier allocated by the backend numbering endpoint.
///
/// Allocated exactly once per checkout attempt and never reused: it is the
/// idempotency key correlating the header write and all item writes of one
/// submission. A retried checkout allocates a fresh number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(pub String);

impl OrderNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated customer placing the order.
///
/// Authentication itself happens elsewhere; the checkout core only requires
/// that `client_id` is non-empty before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Backend client identifier
    pub client_id: String,
    /// Display name (snapshot for the order record)
    pub display_name: String,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            display_name: display_name.into(),
        }
    }
}

// ============================================================================
// Payment and service selection
// ============================================================================

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Cash or card on delivery / at the table
    #[default]
    PayOnDelivery,
    /// Online payment completed before submission
    Online,
    /// Invoice the customer later
    CreditPayLater,
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::PayOnDelivery => write!(f, "Pay on Delivery"),
            PaymentMode::Online => write!(f, "Online"),
            PaymentMode::CreditPayLater => write!(f, "Credit (Pay Later)"),
        }
    }
}

/// Which fulfillment flow the order follows.
///
/// The two kinds carry disjoint status vocabularies (see
/// [`super::status`]); an order never changes kind after submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Eat in, progresses to "Table Ready"
    DineIn,
    /// Deliver to an address, progresses to "In Transit"
    Delivery,
}

// ============================================================================
// Cart snapshot
// ============================================================================

/// One cart position at checkout time.
///
/// A read-only snapshot: prices are already resolved by the catalog, the
/// checkout core never mutates quantities. Negative quantities are
/// unrepresentable; zero quantity and negative prices are rejected by the
/// pricing engine before any network call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog item code
    pub item_code: String,
    /// Item description (snapshot for the order record)
    pub description: String,
    /// Unit of measure (e.g. "Nos", "Plate")
    pub uom: String,
    /// Ordered quantity
    pub quantity: u32,
    /// Unit price excluding VAT
    pub unit_price: Decimal,
    /// Whether VAT applies to this line
    pub vatable: bool,
}

impl CartLine {
    pub fn new(
        item_code: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            description: description.into(),
            uom: "Nos".to_string(),
            quantity,
            unit_price,
            vatable: true,
        }
    }

    /// Set the unit of measure
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = uom.into();
        self
    }

    /// Mark the line VAT-exempt
    pub fn vat_exempt(mut self) -> Self {
        self.vatable = false;
        self
    }
}

// ============================================================================
// Persisted forms
// ============================================================================

/// Order header in its persisted form, one write per order.
///
/// Immutable once the header write succeeds; there is no update path in this
/// core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    /// Allocated order number (idempotency key for the whole submission)
    pub order_number: OrderNumber,
    /// Customer placing the order
    pub client_id: String,
    /// Customer display name snapshot
    pub client_name: String,
    /// Creation timestamp (Unix milliseconds, client clock)
    pub created_at: i64,
    /// Order date as stored by the backend (`YYYY-MM-DD`)
    pub order_date: String,
    /// Sum of line amounts excluding VAT
    pub subtotal_excl_vat: Decimal,
    /// Total VAT over vatable lines
    pub vat_amount: Decimal,
    /// `subtotal_excl_vat + vat_amount`
    pub total_incl_vat: Decimal,
    /// ISO currency code (e.g. "MXN")
    pub currency: String,
    /// Selected payment mode
    pub payment_mode: PaymentMode,
    /// Dine-in or delivery
    pub kind: OrderKind,
    /// Delivery address (delivery orders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Contact phone (delivery orders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// Table number (dine-in orders)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_no: Option<String>,
    /// Free-text order notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order line in its persisted form, one write per cart position.
///
/// `serial_no` is 1-based and fixed by the cart's display order at
/// submission time: strictly increasing, no gaps, never reordered. Lines are
/// never updated or deleted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Owning order number
    pub order_number: OrderNumber,
    /// Order date (`YYYY-MM-DD`, same day as the header)
    pub order_date: String,
    /// 1-based position within the order
    pub serial_no: u32,
    /// Catalog item code
    pub item_code: String,
    /// Item description snapshot
    pub description: String,
    /// Unit of measure
    pub uom: String,
    /// Ordered quantity
    pub quantity: u32,
    /// Unit price excluding VAT (rounded to currency precision)
    pub rate_excl_vat: Decimal,
    /// VAT amount for the whole line (rounded)
    pub vat_amount: Decimal,
    /// Line total including VAT (rounded)
    pub amount_incl_vat: Decimal,
    /// ISO currency code
    pub currency: String,
    /// Creator identity (the ordering client)
    pub created_by: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}
