//! Checkout flow against the in-memory store and the stub gateway.
//!
//! Flow:
//! 1. Build a CartOrder
//! 2. request() inserts the order, stores the body, calls the gateway
//! 3. Verify: commit/rollback, stored body, returned URL, emitted logs

use std::io::Write;
use std::sync::{Arc, Mutex};

use cielo_checkout::{CheckoutError, CheckoutService, StubGateway};
use cielo_connectors::CieloRestError;
use cielo_domain::{Amount, CartItem, CartOrder, PayableRef, PaymentStatus, Percent};
use cielo_store::{CheckoutOrderStore, MemoryStore, StoreError};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;

// =============================================================================
// Helpers
// =============================================================================

fn setup() -> (Arc<StubGateway>, Arc<MemoryStore>, CheckoutService<StubGateway, MemoryStore>) {
    let gateway = Arc::new(StubGateway::new("https://checkout.test"));
    let store = Arc::new(MemoryStore::new());
    let service = CheckoutService::new(gateway.clone(), store.clone());
    (gateway, store, service)
}

fn invoice() -> PayableRef {
    PayableRef::new("invoice", "42").unwrap()
}

fn sample_order() -> CartOrder {
    let mut order = CartOrder::new();
    order
        .set_soft_descriptor("MyStore")
        .configure_cart(|cart| {
            cart.add_item(CartItem::new("Mug", Amount::new(dec!(25.90)).unwrap(), 2).unwrap());
        })
        .configure_payment(|payment| payment.boleto_discount = Some(Percent::new(5).unwrap()))
        .configure_customer(|customer| customer.email = Some("maria@example.com".to_string()))
        .enable_antifraud();
    order
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// `fields` of every ERROR event, one JSON object per line
    fn error_fields(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .filter(|event| event["level"] == "ERROR")
            .map(|event| event["fields"].clone())
            .collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_request_success_commits_and_returns_url() {
    let (gateway, store, service) = setup();
    let mut order = sample_order();

    let url = service.request(&mut order, &invoice()).await.unwrap();

    // Exactly one committed order
    assert_eq!(store.order_count(), 1);
    assert_eq!(store.commit_count(), 1);
    assert_eq!(store.rollback_count(), 0);

    let orders = store.find_by_payable(&invoice()).await.unwrap();
    assert_eq!(orders.len(), 1);
    let stored = &orders[0];

    // Builder got the persisted id as order number
    assert_eq!(order.order_number(), Some(stored.order_number().as_str()));

    // Stored body is the builder's serialization
    let body = stored.body.clone().expect("body stored");
    assert_eq!(body, order.to_value().unwrap());
    assert_eq!(body["OrderNumber"], json!(stored.order_id.to_string()));
    assert_eq!(body["SoftDescriptor"], json!("MyStore"));
    assert_eq!(body["Options"], json!({"AntifraudEnabled": true}));
    assert_eq!(body["Cart"]["Items"][0]["UnitPrice"], json!(2590));

    // Same body was sent to the gateway
    assert_eq!(gateway.requests(), vec![body]);

    assert_eq!(url, gateway.checkout_url_for(&stored.order_number()));
    assert!(stored.payment_status.is_none());
    assert!(stored.notification.is_none());
}

#[tokio::test]
async fn test_each_request_creates_its_own_order() {
    let (_gateway, store, service) = setup();

    let first = service.request(&mut sample_order(), &invoice()).await.unwrap();
    let second = service.request(&mut sample_order(), &invoice()).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.order_count(), 2);
    assert_eq!(service.orders_for(&invoice()).await.unwrap().len(), 2);
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_api_error_rolls_back_logs_and_returns_server_error() {
    let (logs, _guard) = capture_logs();
    let (gateway, store, service) = setup();
    gateway.set_fail_next(CieloRestError::ApiError {
        code: 503,
        message: "Service Unavailable".to_string(),
    });

    let result = service.request(&mut sample_order(), &invoice()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CheckoutError::ServerError));
    assert_eq!(err.status_code(), 500);

    // Insert rolled back
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.rollback_count(), 1);
    assert_eq!(store.commit_count(), 0);
    assert!(service.orders_for(&invoice()).await.unwrap().is_empty());

    // Failure logged with code and message
    let events = logs.error_fields();
    assert_eq!(events.len(), 1, "logs: {}", logs.contents());
    assert_eq!(events[0]["code"], json!(503));
    assert_eq!(events[0]["message"], json!("Cielo API error: 503 - Service Unavailable"));
    assert_eq!(events[0]["payable"], json!("invoice:42"));
}

#[tokio::test]
async fn test_timeout_takes_transport_failure_path() {
    let (logs, _guard) = capture_logs();
    let (gateway, store, service) = setup();
    gateway.set_fail_next(CieloRestError::Timeout);

    let result = service.request(&mut sample_order(), &invoice()).await;

    assert!(matches!(result, Err(CheckoutError::ServerError)));
    assert_eq!(store.order_count(), 0);
    let events = logs.error_fields();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["code"], json!(0));
    assert_eq!(events[0]["message"], json!("Request timed out"));
}

#[tokio::test]
async fn test_connection_failure_takes_transport_failure_path() {
    let (gateway, store, service) = setup();
    gateway.set_fail_next(CieloRestError::RequestFailed("connection refused".to_string()));

    let result = service.request(&mut sample_order(), &invoice()).await;

    assert!(matches!(result, Err(CheckoutError::ServerError)));
    assert_eq!(store.order_count(), 0);
}

// =============================================================================
// Other failures
// =============================================================================

#[tokio::test]
async fn test_store_failure_propagates_unchanged() {
    let (gateway, store, service) = setup();
    store.set_fail_next_write(true);

    let result = service.request(&mut sample_order(), &invoice()).await;

    match result {
        Err(CheckoutError::Store(StoreError::Database(msg))) => {
            assert_eq!(msg, "Simulated write failure");
        },
        other => panic!("Expected store error, got {:?}", other),
    }
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.rollback_count(), 1);
    // Never reached the gateway
    assert_eq!(gateway.request_count(), 0);
}

#[tokio::test]
async fn test_body_update_failure_propagates_unchanged() {
    let (gateway, store, service) = setup();
    // Write 1 is the insert, write 2 the body update
    store.set_fail_on_write(2);

    let mut order = sample_order();
    let result = service.request(&mut order, &invoice()).await;

    match result {
        Err(CheckoutError::Store(StoreError::Database(msg))) => {
            assert_eq!(msg, "Simulated write failure");
        },
        other => panic!("Expected store error, got {:?}", other),
    }
    // Order number was already assigned from the discarded insert
    assert!(order.order_number().is_some());
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.rollback_count(), 1);
    assert_eq!(store.commit_count(), 0);
    assert_eq!(gateway.request_count(), 0);
}

#[tokio::test]
async fn test_commit_failure_propagates_unchanged() {
    let (logs, _guard) = capture_logs();
    let (gateway, store, service) = setup();
    store.set_fail_on_write(3);

    let result = service.request(&mut sample_order(), &invoice()).await;

    assert!(matches!(result, Err(CheckoutError::Store(StoreError::Database(_)))));
    assert_eq!(gateway.request_count(), 1);
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.commit_count(), 0);
    assert_eq!(store.rollback_count(), 1);
    assert!(logs.error_fields().is_empty());
}

#[tokio::test]
async fn test_unparseable_response_propagates_unchanged() {
    let (logs, _guard) = capture_logs();
    let (gateway, store, service) = setup();
    gateway.set_fail_next(CieloRestError::ParseError("missing field `settings`".to_string()));

    let result = service.request(&mut sample_order(), &invoice()).await;

    match result {
        Err(CheckoutError::Gateway(CieloRestError::ParseError(msg))) => {
            assert_eq!(msg, "missing field `settings`");
        },
        other => panic!("Expected parse error, got {:?}", other),
    }
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.rollback_count(), 1);
    assert!(logs.error_fields().is_empty());
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn test_apply_notification_updates_status() {
    let (_gateway, store, service) = setup();
    let mut order = sample_order();
    service.request(&mut order, &invoice()).await.unwrap();
    let order_number = order.order_number().unwrap().to_string();

    let payload = json!({
        "order_number": order_number,
        "amount": 5180,
        "payment_status": "2"
    });
    let updated = service.apply_notification(&payload).await.unwrap();

    assert_eq!(updated.payment_status, Some(PaymentStatus::Paid));
    assert_eq!(updated.notification, Some(payload));

    let stored = service.find_order(updated.order_id).await.unwrap().unwrap();
    assert_eq!(stored.payment_status, Some(PaymentStatus::Paid));
    assert!(stored.body.is_some());
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_apply_notification_rejects_bad_payloads() {
    let (_gateway, _store, service) = setup();
    let mut order = sample_order();
    service.request(&mut order, &invoice()).await.unwrap();
    let order_number = order.order_number().unwrap().to_string();

    let missing_status = service.apply_notification(&json!({"order_number": order_number})).await;
    assert!(matches!(missing_status, Err(CheckoutError::InvalidNotification(_))));

    let unknown_status = service
        .apply_notification(&json!({"order_number": order_number, "payment_status": 42}))
        .await;
    assert!(matches!(unknown_status, Err(CheckoutError::Domain(_))));

    let unknown_order = service
        .apply_notification(&json!({
            "order_number": uuid::Uuid::now_v7().to_string(),
            "payment_status": 2
        }))
        .await
        .unwrap_err();
    assert!(matches!(unknown_order, CheckoutError::Store(StoreError::OrderNotFound(_))));
    assert_eq!(unknown_order.status_code(), 404);
}
