// comanda-client/tests/checkout_saga.rs
// Checkout pipeline tests against a recording backend double

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use comanda_client::backend::{OrderHistoryRecord, SaveOrderHeaderRequest, SaveOrderLineRequest};
use comanda_client::{
    BackendError, BackendResult, CartLine, CheckoutContext, CheckoutError, ClientConfig,
    ClientIdentity, OrderBackend, OrderHeader, OrderKind, OrderLine, OrderNumber, OrderSubmission,
    PaymentMode, SagaState, SagaStep, fetch_placed_orders, place_order,
};

/// What the backend saw, in arrival order
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Allocate(String),
    Header(String),
    Item(String, u32),
}

/// Test double that records every call and fails on demand
#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    counter: AtomicU32,
    fail_allocation: bool,
    /// Fail this many header writes before succeeding
    fail_header_times: AtomicU32,
    fail_item_serial: Option<u32>,
    history: Vec<OrderHistoryRecord>,
}

impl RecordingBackend {
    fn new() -> Self {
        Self::default()
    }

    fn failing_allocation() -> Self {
        Self {
            fail_allocation: true,
            ..Self::default()
        }
    }

    fn failing_header(times: u32) -> Self {
        Self {
            fail_header_times: AtomicU32::new(times),
            ..Self::default()
        }
    }

    fn failing_item(serial_no: u32) -> Self {
        Self {
            fail_item_serial: Some(serial_no),
            ..Self::default()
        }
    }

    fn with_history(mut self, rows: Vec<OrderHistoryRecord>) -> Self {
        self.history = rows;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderBackend for RecordingBackend {
    async fn next_order_number(&self) -> BackendResult<OrderNumber> {
        if self.fail_allocation {
            return Err(BackendError::Backend("numbering counter offline".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let number = format!("ORD-{n:05}");
        self.calls
            .lock()
            .unwrap()
            .push(Call::Allocate(number.clone()));
        Ok(OrderNumber::new(number))
    }

    async fn save_order_header(&self, request: &SaveOrderHeaderRequest) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Header(request.header.order_number.to_string()));
        if self.fail_header_times.load(Ordering::SeqCst) > 0 {
            self.fail_header_times.fetch_sub(1, Ordering::SeqCst);
            return Err(BackendError::Backend("Could not insert header".to_string()));
        }
        Ok(())
    }

    async fn save_order_line(&self, line: &SaveOrderLineRequest) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Item(line.order_number.to_string(), line.serial_no));
        if self.fail_item_serial == Some(line.serial_no) {
            return Err(BackendError::Backend("Could not insert row".to_string()));
        }
        Ok(())
    }

    async fn order_history(&self, _client_id: &str) -> BackendResult<Vec<OrderHistoryRecord>> {
        Ok(self.history.clone())
    }
}

// ========== Helpers ==========

fn make_config() -> ClientConfig {
    ClientConfig::new("http://localhost:8080")
}

fn make_cart() -> Vec<CartLine> {
    vec![
        CartLine::new("ITM-1", "Lamb plate", 2, Decimal::new(1000, 0)),
        CartLine::new("ITM-2", "Bottled water", 1, Decimal::new(500, 0)).vat_exempt(),
        CartLine::new("ITM-3", "Flan", 3, Decimal::new(250, 0)),
    ]
}

fn make_context() -> CheckoutContext {
    CheckoutContext::new(
        ClientIdentity::new("client-7", "Ana Torres"),
        make_cart(),
        OrderKind::Delivery,
    )
    .with_delivery_address("12 Calle Norte")
    .with_contact_phone("555-0142")
}

fn make_header(number: &OrderNumber, count: u32) -> OrderHeader {
    // Totals agree with `make_lines`: each line is 100.00 net + 16.00 VAT
    OrderHeader {
        order_number: number.clone(),
        client_id: "client-7".to_string(),
        client_name: "Ana Torres".to_string(),
        created_at: 0,
        order_date: "2026-08-24".to_string(),
        subtotal_excl_vat: Decimal::from(100 * count),
        vat_amount: Decimal::from(16 * count),
        total_incl_vat: Decimal::from(116 * count),
        currency: "MXN".to_string(),
        payment_mode: PaymentMode::PayOnDelivery,
        kind: OrderKind::Delivery,
        delivery_address: Some("12 Calle Norte".to_string()),
        contact_phone: None,
        table_no: None,
        notes: None,
    }
}

fn make_lines(number: &OrderNumber, count: u32) -> Vec<OrderLine> {
    (1..=count)
        .map(|serial_no| OrderLine {
            order_number: number.clone(),
            order_date: "2026-08-24".to_string(),
            serial_no,
            item_code: format!("ITM-{serial_no}"),
            description: "Test item".to_string(),
            uom: "Nos".to_string(),
            quantity: 1,
            rate_excl_vat: Decimal::new(100, 0),
            vat_amount: Decimal::new(16, 0),
            amount_incl_vat: Decimal::new(116, 0),
            currency: "MXN".to_string(),
            created_by: "client-7".to_string(),
            created_at: 0,
        })
        .collect()
}

// ========== Pipeline tests ==========

#[tokio::test]
async fn test_happy_path_writes_header_then_items_in_cart_order() {
    let backend = RecordingBackend::new();
    let receipt = place_order(&backend, &make_config(), &make_context())
        .await
        .unwrap();

    assert_eq!(receipt.lines_saved, 3);
    assert_eq!(receipt.totals.subtotal_excl_vat, Decimal::new(3250, 0));
    assert_eq!(receipt.totals.vat_amount, Decimal::new(440, 0));
    assert_eq!(receipt.totals.total_incl_vat, Decimal::new(3690, 0));

    let n = receipt.order_number.to_string();
    assert_eq!(
        backend.calls(),
        vec![
            Call::Allocate(n.clone()),
            Call::Header(n.clone()),
            Call::Item(n.clone(), 1),
            Call::Item(n.clone(), 2),
            Call::Item(n, 3),
        ]
    );
}

#[tokio::test]
async fn test_header_failure_attempts_no_items() {
    let backend = RecordingBackend::failing_header(1);
    let err = place_order(&backend, &make_config(), &make_context())
        .await
        .unwrap_err();

    match err {
        CheckoutError::HeaderPersist { order_number, .. } => {
            assert_eq!(order_number.as_str(), "ORD-00001");
        }
        other => panic!("expected HeaderPersist, got {other:?}"),
    }
    assert!(
        backend
            .calls()
            .iter()
            .all(|c| !matches!(c, Call::Item(_, _)))
    );
}

#[tokio::test]
async fn test_item_failure_reports_exact_partial_state() {
    let backend = RecordingBackend::failing_item(2);
    let err = place_order(&backend, &make_config(), &make_context())
        .await
        .unwrap_err();

    match err {
        CheckoutError::ItemPersist {
            order_number,
            serial_no,
            persisted,
            total,
            ..
        } => {
            assert_eq!(order_number.as_str(), "ORD-00001");
            assert_eq!(serial_no, 2);
            assert_eq!(persisted, 1);
            assert_eq!(total, 3);
        }
        other => panic!("expected ItemPersist, got {other:?}"),
    }

    // Lines 1 and 2 were attempted in order; line 3 never was
    let calls = backend.calls();
    let n = "ORD-00001".to_string();
    assert!(calls.contains(&Call::Item(n.clone(), 1)));
    assert!(calls.contains(&Call::Item(n, 2)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Item(_, 3))));
}

#[tokio::test]
async fn test_allocation_failure_writes_nothing() {
    let backend = RecordingBackend::failing_allocation();
    let err = place_order(&backend, &make_config(), &make_context())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Allocation { .. }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_retry_allocates_a_fresh_number() {
    let backend = RecordingBackend::failing_header(1);
    let ctx = make_context();
    let config = make_config();

    let first = place_order(&backend, &config, &ctx).await.unwrap_err();
    assert!(matches!(first, CheckoutError::HeaderPersist { .. }));

    let receipt = place_order(&backend, &config, &ctx).await.unwrap();
    assert_eq!(receipt.order_number.as_str(), "ORD-00002");

    // Two allocations; the failed attempt's number is never reused
    let allocations: Vec<_> = backend
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Allocate(n) => Some(n),
            _ => None,
        })
        .collect();
    assert_eq!(allocations, vec!["ORD-00001", "ORD-00002"]);
    assert!(
        backend
            .calls()
            .iter()
            .all(|c| !matches!(c, Call::Item(n, _) if n == "ORD-00001"))
    );
}

#[tokio::test]
async fn test_validation_failures_touch_no_network() {
    let backend = RecordingBackend::new();
    let config = make_config();

    let empty_cart = CheckoutContext::new(
        ClientIdentity::new("client-7", "Ana Torres"),
        Vec::new(),
        OrderKind::DineIn,
    );
    let err = place_order(&backend, &config, &empty_cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));

    let no_identity = CheckoutContext::new(
        ClientIdentity::new("", "Nobody"),
        make_cart(),
        OrderKind::DineIn,
    );
    let err = place_order(&backend, &config, &no_identity).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));

    assert!(backend.calls().is_empty());
}

// ========== Saga state tests ==========

#[tokio::test]
async fn test_saga_state_reaches_all_items_saved() {
    let backend = RecordingBackend::new();
    let number = OrderNumber::new("ORD-7");
    let mut submission = OrderSubmission::new(make_header(&number, 3), make_lines(&number, 3));

    assert_eq!(submission.state(), SagaState::NotStarted);
    submission.run(&backend).await.unwrap();
    assert_eq!(submission.state(), SagaState::AllItemsSaved);
}

#[tokio::test]
async fn test_saga_state_pins_the_failed_step() {
    let backend = RecordingBackend::failing_item(2);
    let number = OrderNumber::new("ORD-7");
    let mut submission = OrderSubmission::new(make_header(&number, 3), make_lines(&number, 3));

    submission.run(&backend).await.unwrap_err();
    assert_eq!(
        submission.state(),
        SagaState::Failed {
            step: SagaStep::Item { serial_no: 2 }
        }
    );

    let backend = RecordingBackend::failing_header(1);
    let mut submission = OrderSubmission::new(make_header(&number, 3), make_lines(&number, 3));
    submission.run(&backend).await.unwrap_err();
    assert_eq!(
        submission.state(),
        SagaState::Failed {
            step: SagaStep::Header
        }
    );
}

#[tokio::test]
async fn test_failed_submission_refuses_a_rerun() {
    let backend = RecordingBackend::failing_item(2);
    let number = OrderNumber::new("ORD-7");
    let mut submission = OrderSubmission::new(make_header(&number, 3), make_lines(&number, 3));

    submission.run(&backend).await.unwrap_err();
    let calls_after_failure = backend.calls().len();

    // The failed run consumed the number; a rerun must not replay any write
    let err = submission.run(&backend).await.unwrap_err();
    match err {
        CheckoutError::Replay { order_number } => {
            assert_eq!(order_number.as_str(), "ORD-7");
        }
        other => panic!("expected Replay, got {other:?}"),
    }
    assert_eq!(backend.calls().len(), calls_after_failure);
    assert_eq!(
        submission.state(),
        SagaState::Failed {
            step: SagaStep::Item { serial_no: 2 }
        }
    );
}

#[tokio::test]
async fn test_completed_submission_refuses_a_rerun() {
    let backend = RecordingBackend::new();
    let number = OrderNumber::new("ORD-8");
    let mut submission = OrderSubmission::new(make_header(&number, 3), make_lines(&number, 3));

    submission.run(&backend).await.unwrap();
    let calls_after_success = backend.calls().len();

    let err = submission.run(&backend).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Replay { .. }));
    assert_eq!(backend.calls().len(), calls_after_success);
    assert_eq!(submission.state(), SagaState::AllItemsSaved);
}

// ========== History tests ==========

#[tokio::test]
async fn test_history_fetch_translates_codes() {
    let rows = vec![
        OrderHistoryRecord {
            order_no: OrderNumber::new("ORD-1"),
            status_code: 2,
            placed_at: "2026-08-20".to_string(),
            total_incl_vat: Decimal::new(2820, 0),
            currency: "MXN".to_string(),
        },
        OrderHistoryRecord {
            order_no: OrderNumber::new("ORD-2"),
            status_code: 9,
            placed_at: "2026-08-21".to_string(),
            total_incl_vat: Decimal::new(500, 0),
            currency: "MXN".to_string(),
        },
    ];
    let backend = RecordingBackend::new().with_history(rows);

    let orders = fetch_placed_orders(&backend, "client-7").await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status_label(), "In Transit");
    // Unrecognized codes degrade instead of failing the fetch
    assert_eq!(orders[1].status_label(), "Unknown Status");
    assert_eq!(orders[1].progress, 0.0);
}
