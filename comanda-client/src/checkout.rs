//! Checkout pipeline and order submission saga
//!
//! [`place_order`] runs one checkout attempt end to end: validate the
//! context, price the cart, allocate an order number, then persist the order
//! through [`OrderSubmission`] as a header write followed by strictly
//! sequential item writes. There is no transaction spanning the writes and
//! no compensation on failure; the error taxonomy reports exactly how far an
//! attempt got.

use rust_decimal::Decimal;
use shared::order::{
    CartLine, ClientIdentity, DeliveryStatus, DineInStatus, OrderHeader, OrderKind, OrderLine,
    OrderNumber, PaymentMode, StatusHistory,
};
use shared::util::{now_millis, today_string};
use uuid::Uuid;

use crate::backend::{OrderBackend, SaveOrderHeaderRequest};
use crate::config::ClientConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::pricing::{PricingResult, compute_totals, price_line};

// ============================================================================
// Checkout context
// ============================================================================

/// Everything one checkout attempt needs, passed explicitly.
///
/// No hidden session or global cart state: the caller snapshots the cart and
/// identity into a context and hands it to [`place_order`]. The context is
/// not consumed, so a failed attempt can be retried with the same value.
#[derive(Debug, Clone)]
pub struct CheckoutContext {
    /// Authenticated customer
    pub identity: ClientIdentity,
    /// Cart snapshot, in display order
    pub lines: Vec<CartLine>,
    /// Dine-in or delivery
    pub kind: OrderKind,
    /// Selected payment mode
    pub payment_mode: PaymentMode,
    /// Delivery address (required for delivery orders)
    pub delivery_address: Option<String>,
    /// Contact phone
    pub contact_phone: Option<String>,
    /// Table number (dine-in orders)
    pub table_no: Option<String>,
    /// Free-text order notes
    pub notes: Option<String>,
}

impl CheckoutContext {
    pub fn new(identity: ClientIdentity, lines: Vec<CartLine>, kind: OrderKind) -> Self {
        Self {
            identity,
            lines,
            kind,
            payment_mode: PaymentMode::default(),
            delivery_address: None,
            contact_phone: None,
            table_no: None,
            notes: None,
        }
    }

    /// Set the payment mode
    pub fn with_payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = mode;
        self
    }

    /// Set the delivery address
    pub fn with_delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    /// Set the contact phone
    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }

    /// Set the table number
    pub fn with_table_no(mut self, table: impl Into<String>) -> Self {
        self.table_no = Some(table.into());
        self
    }

    /// Set the order notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Pre-flight checks; nothing touches the network before these pass
    fn validate(&self) -> CheckoutResult<()> {
        if self.identity.client_id.trim().is_empty() {
            return Err(CheckoutError::Validation(
                "Client identity is required".to_string(),
            ));
        }

        let has_address = self
            .delivery_address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        if self.kind == OrderKind::Delivery && !has_address {
            return Err(CheckoutError::Validation(
                "Delivery orders need a delivery address".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Submission saga
// ============================================================================

/// Saga step a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    /// The header write
    Header,
    /// An item write (1-based serial)
    Item { serial_no: u32 },
}

/// Observable state of one submission run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SagaState {
    /// No write issued yet
    #[default]
    NotStarted,
    /// Header write in flight
    SubmittingHeader,
    /// Header acked; item writes pending
    HeaderSaved,
    /// Item write in flight
    SubmittingItem { serial_no: u32 },
    /// Every write acked
    AllItemsSaved,
    /// Terminal failure at `step`; earlier writes stay persisted
    Failed { step: SagaStep },
}

/// One order's submission: a header write followed by strictly sequential
/// item writes.
///
/// The next write is issued only after the previous acknowledgement arrives;
/// two writes of the same submission are never in flight at once. A failed
/// run leaves the already-acked prefix persisted on the backend, and so does
/// dropping the future mid-run. Callers see how far a run got through
/// [`OrderSubmission::state`] and the returned error.
///
/// A submission is single-use: its order number is consumed by the first
/// [`run`](OrderSubmission::run), successful or not.
#[derive(Debug)]
pub struct OrderSubmission {
    attempt_id: Uuid,
    header: SaveOrderHeaderRequest,
    lines: Vec<OrderLine>,
    state: SagaState,
}

impl OrderSubmission {
    /// Build a submission from the persisted forms
    pub fn new(header: OrderHeader, lines: Vec<OrderLine>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            header: SaveOrderHeaderRequest::new(header),
            lines,
            state: SagaState::default(),
        }
    }

    /// Current saga state
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Order number this submission is keyed by
    pub fn order_number(&self) -> &OrderNumber {
        &self.header.header.order_number
    }

    /// Check the submission is internally consistent before any network call
    fn check_preconditions(&self) -> CheckoutResult<()> {
        let header = &self.header.header;

        if self.lines.is_empty() {
            return Err(CheckoutError::Validation(
                "Nothing to submit: order has no lines".to_string(),
            ));
        }

        if header.total_incl_vat != header.subtotal_excl_vat + header.vat_amount {
            return Err(CheckoutError::Validation(format!(
                "Header totals are inconsistent: {} + {} != {}",
                header.subtotal_excl_vat, header.vat_amount, header.total_incl_vat
            )));
        }

        // Line amounts round per line, header totals once over the cart;
        // consistent pricing agrees to within a cent per line.
        let line_total: Decimal = self.lines.iter().map(|l| l.amount_incl_vat).sum();
        let tolerance = Decimal::new(1, 2) * Decimal::from(self.lines.len() as u32 + 1);
        if (line_total - header.total_incl_vat).abs() > tolerance {
            return Err(CheckoutError::Validation(format!(
                "Header total {} does not match the line amounts ({})",
                header.total_incl_vat, line_total
            )));
        }

        for (idx, line) in self.lines.iter().enumerate() {
            let expected = idx as u32 + 1;
            if line.serial_no != expected {
                return Err(CheckoutError::Validation(format!(
                    "Order lines must be serialized 1..{} in cart order (position {} has serial {})",
                    self.lines.len(),
                    idx + 1,
                    line.serial_no
                )));
            }
            if line.order_number != header.order_number {
                return Err(CheckoutError::Validation(format!(
                    "Line {} carries order number {}, header has {}",
                    expected, line.order_number, header.order_number
                )));
            }
        }

        Ok(())
    }

    /// Run the saga to completion against `backend`.
    ///
    /// Returns only after every write is acked, or at the first failure.
    /// Once a run has started, any further call is refused with
    /// [`CheckoutError::Replay`] before touching the network; retrying an
    /// order means a fresh allocation via [`place_order`].
    pub async fn run<B: OrderBackend + ?Sized>(&mut self, backend: &B) -> CheckoutResult<()> {
        // Refuse to reissue writes under a consumed order number
        if self.state != SagaState::NotStarted {
            return Err(CheckoutError::Replay {
                order_number: self.order_number().clone(),
            });
        }
        self.check_preconditions()?;
        let order_number = self.order_number().clone();
        let total = self.lines.len() as u32;

        // 1. Header write; no item is attempted until it acks
        self.state = SagaState::SubmittingHeader;
        tracing::info!(
            attempt_id = %self.attempt_id,
            order_number = %order_number,
            lines = total,
            "Submitting order header"
        );
        if let Err(e) = backend.save_order_header(&self.header).await {
            self.state = SagaState::Failed {
                step: SagaStep::Header,
            };
            tracing::error!(
                attempt_id = %self.attempt_id,
                order_number = %order_number,
                "Header write failed: {e}"
            );
            return Err(CheckoutError::HeaderPersist {
                order_number,
                source: e,
            });
        }
        self.state = SagaState::HeaderSaved;

        // 2. Item writes, one at a time, in cart order
        for idx in 0..self.lines.len() {
            let serial_no = idx as u32 + 1;
            self.state = SagaState::SubmittingItem { serial_no };
            tracing::debug!(
                attempt_id = %self.attempt_id,
                order_number = %order_number,
                serial_no,
                "Submitting order line"
            );
            if let Err(e) = backend.save_order_line(&self.lines[idx]).await {
                self.state = SagaState::Failed {
                    step: SagaStep::Item { serial_no },
                };
                tracing::error!(
                    attempt_id = %self.attempt_id,
                    order_number = %order_number,
                    serial_no,
                    persisted = serial_no - 1,
                    "Item write failed: {e}"
                );
                return Err(CheckoutError::ItemPersist {
                    order_number,
                    serial_no,
                    persisted: serial_no - 1,
                    total,
                    source: e,
                });
            }
        }

        // 3. Done
        self.state = SagaState::AllItemsSaved;
        tracing::info!(
            attempt_id = %self.attempt_id,
            order_number = %order_number,
            lines = total,
            "Order fully submitted"
        );
        Ok(())
    }
}

// ============================================================================
// Receipt
// ============================================================================

/// Proof of a fully persisted order
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckoutReceipt {
    /// Allocated order number
    pub order_number: OrderNumber,
    /// Order date (`YYYY-MM-DD`)
    pub order_date: String,
    /// Submission timestamp (Unix milliseconds)
    pub placed_at: i64,
    /// ISO currency code
    pub currency: String,
    /// Dine-in or delivery
    pub kind: OrderKind,
    /// Totals as persisted on the header
    pub totals: PricingResult,
    /// Number of lines persisted (all of them)
    pub lines_saved: u32,
}

impl CheckoutReceipt {
    /// Fresh local status log for this order, seeded with "Order Placed"
    pub fn initial_tracking(&self) -> OrderTracking {
        match self.kind {
            OrderKind::DineIn => {
                OrderTracking::DineIn(StatusHistory::starting_at(DineInStatus::OrderPlaced))
            }
            OrderKind::Delivery => {
                OrderTracking::Delivery(StatusHistory::starting_at(DeliveryStatus::OrderPlaced))
            }
        }
    }
}

/// Local status log in the vocabulary matching the order's kind
#[derive(Debug, Clone)]
pub enum OrderTracking {
    DineIn(StatusHistory<DineInStatus>),
    Delivery(StatusHistory<DeliveryStatus>),
}

impl OrderTracking {
    /// Display label of the current status
    pub fn current_label(&self) -> String {
        match self {
            OrderTracking::DineIn(h) => h.current().map(|s| s.to_string()),
            OrderTracking::Delivery(h) => h.current().map(|s| s.to_string()),
        }
        .unwrap_or_default()
    }

    /// Progress through the vocabulary, `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        match self {
            OrderTracking::DineIn(h) => h.progress(),
            OrderTracking::Delivery(h) => h.progress(),
        }
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run one checkout attempt end to end: validate, price, allocate, submit.
///
/// No automatic retries. A caller retry runs the whole pipeline again and
/// allocates a fresh order number; numbers from failed attempts are never
/// reused. Concurrent attempts (two open tabs, say) are not mutually
/// excluded here: the number counter is owned by the backend.
///
/// On [`CheckoutError::ItemPersist`] the backend keeps the header and the
/// acked line prefix; the error fields say exactly how far the order got.
/// Clearing the cart after success is the caller's job.
pub async fn place_order<B: OrderBackend + ?Sized>(
    backend: &B,
    config: &ClientConfig,
    ctx: &CheckoutContext,
) -> CheckoutResult<CheckoutReceipt> {
    // 1. Validate and price before any network call
    ctx.validate()?;
    let totals = compute_totals(&ctx.lines, config.vat_rate)?;

    // 2. Allocate this attempt's order number
    let order_number = backend
        .next_order_number()
        .await
        .map_err(|source| CheckoutError::Allocation { source })?;
    tracing::info!(order_number = %order_number, "Allocated order number");

    // 3. Build the persisted forms
    let placed_at = now_millis();
    let order_date = today_string();
    let header = build_header(ctx, config, &order_number, &order_date, placed_at, &totals);
    let lines = build_lines(ctx, config, &order_number, &order_date, placed_at);

    // 4. Submit: header first, then items in cart order
    let mut submission = OrderSubmission::new(header, lines);
    submission.run(backend).await?;

    Ok(CheckoutReceipt {
        order_number,
        order_date,
        placed_at,
        currency: config.currency.clone(),
        kind: ctx.kind,
        totals,
        lines_saved: ctx.lines.len() as u32,
    })
}

fn build_header(
    ctx: &CheckoutContext,
    config: &ClientConfig,
    order_number: &OrderNumber,
    order_date: &str,
    placed_at: i64,
    totals: &PricingResult,
) -> OrderHeader {
    OrderHeader {
        order_number: order_number.clone(),
        client_id: ctx.identity.client_id.clone(),
        client_name: ctx.identity.display_name.clone(),
        created_at: placed_at,
        order_date: order_date.to_string(),
        subtotal_excl_vat: totals.subtotal_excl_vat,
        vat_amount: totals.vat_amount,
        total_incl_vat: totals.total_incl_vat,
        currency: config.currency.clone(),
        payment_mode: ctx.payment_mode,
        kind: ctx.kind,
        delivery_address: ctx.delivery_address.clone(),
        contact_phone: ctx.contact_phone.clone(),
        table_no: ctx.table_no.clone(),
        notes: ctx.notes.clone(),
    }
}

fn build_lines(
    ctx: &CheckoutContext,
    config: &ClientConfig,
    order_number: &OrderNumber,
    order_date: &str,
    placed_at: i64,
) -> Vec<OrderLine> {
    ctx.lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let amounts = price_line(line, config.vat_rate);
            OrderLine {
                order_number: order_number.clone(),
                order_date: order_date.to_string(),
                serial_no: idx as u32 + 1,
                item_code: line.item_code.clone(),
                description: line.description.clone(),
                uom: line.uom.clone(),
                quantity: line.quantity,
                rate_excl_vat: amounts.rate,
                vat_amount: amounts.vat,
                amount_incl_vat: amounts.gross,
                currency: config.currency.clone(),
                created_by: ctx.identity.client_id.clone(),
                created_at: placed_at,
            }
        })
        .collect()
}
