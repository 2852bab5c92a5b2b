use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::Arc;
use storefront::application::checkout::{CheckoutEngine, CheckoutPhase, SharedCart};
use storefront::application::store::CartStore;
use storefront::domain::cart::{DeliveryMethod, ItemDetails, Money, UnitPrice};
use storefront::domain::order::{
    BillingInfo, CardDetails, OrderReceipt, OrderRecord, OrderRequest, PaymentMode, PaymentToken,
};
use storefront::domain::ports::{OrderBackend, OrderHandoff, PaymentGateway};
use storefront::domain::pricing::PricingConfig;
use storefront::error::{Result, StorefrontError};
use storefront::infrastructure::in_memory::{InMemoryCartStorage, InMemoryHandoff};
use tokio::sync::Mutex;

fn billing() -> BillingInfo {
    BillingInfo {
        name: "Ada Shopper".to_string(),
        email: "ada@example.com".to_string(),
        phone: Some("555-0100".to_string()),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        region: "OR".to_string(),
        postal_code: "97477".to_string(),
    }
}

fn card() -> CardDetails {
    CardDetails {
        number: "4242424242424242".to_string(),
        exp_month: 12,
        exp_year: 2030,
        cvc: "123".to_string(),
    }
}

fn item(id: &str, price: rust_decimal::Decimal) -> ItemDetails {
    ItemDetails {
        id: id.to_string(),
        name: id.to_string(),
        unit_price: UnitPrice::new(price).unwrap(),
        vendor_id: "vendor-1".to_string(),
        image: None,
        delivery_method: None,
        max_quantity: None,
        sku: None,
    }
}

struct StaticGateway;

#[async_trait]
impl PaymentGateway for StaticGateway {
    async fn tokenize(&self, _billing: &BillingInfo, _card: &CardDetails) -> Result<PaymentToken> {
        Ok(PaymentToken("tok_live".to_string()))
    }
}

/// Captures the order-creation request for later inspection.
#[derive(Clone, Default)]
struct RecordingBackend {
    request: Arc<Mutex<Option<OrderRequest>>>,
}

#[async_trait]
impl OrderBackend for RecordingBackend {
    async fn create_order(&self, request: OrderRequest) -> Result<OrderReceipt> {
        *self.request.lock().await = Some(request);
        Ok(OrderReceipt {
            order_id: "ORD-2002".to_string(),
        })
    }
}

struct FlakyBackend {
    attempts: Arc<Mutex<u32>>,
}

#[async_trait]
impl OrderBackend for FlakyBackend {
    async fn create_order(&self, _request: OrderRequest) -> Result<OrderReceipt> {
        let mut attempts = self.attempts.lock().await;
        *attempts += 1;
        if *attempts == 1 {
            Err(StorefrontError::OrderRejected(
                "temporarily unavailable".to_string(),
            ))
        } else {
            Ok(OrderReceipt {
                order_id: "ORD-RETRY".to_string(),
            })
        }
    }
}

async fn shared_cart() -> SharedCart {
    Arc::new(Mutex::new(CartStore::new(Box::new(
        InMemoryCartStorage::new(),
    ))))
}

#[tokio::test]
async fn test_live_order_request_carries_snapshot() {
    let cart = shared_cart().await;
    {
        let mut cart = cart.lock().await;
        cart.set_delivery_method(DeliveryMethod::Shipping).await;
        cart.add_item(item("widget", dec!(40.00)), 3).await;
        cart.add_item(item("gizmo", dec!(5.50)), 1).await;
    }

    let backend = RecordingBackend::default();
    let handoff = InMemoryHandoff::new();
    let engine = CheckoutEngine::new(PricingConfig::default(), Box::new(handoff.clone()))
        .with_gateway(Box::new(StaticGateway))
        .with_backend(Box::new(backend.clone()));

    let record = engine
        .submit(&cart, &billing(), PaymentMode::Live(card()))
        .await
        .unwrap();

    let request = backend.request.lock().await.clone().unwrap();
    assert_eq!(request.payment_token, PaymentToken("tok_live".to_string()));
    // Shipping mirrors billing in the minimal case.
    assert_eq!(request.shipping, request.billing);
    assert_eq!(request.lines.len(), 2);
    assert_eq!(request.lines[0].line_total, Money::new(dec!(120.00)));
    assert_eq!(request.shipping_line.method, DeliveryMethod::Shipping);
    assert_eq!(request.shipping_line.fee, request.totals.shipping);
    assert_eq!(request.totals, record.totals);

    assert_eq!(record.order_id, "ORD-2002");
    assert!(!record.simulated);
}

#[tokio::test]
async fn test_record_total_is_frozen_at_submission() {
    let cart = shared_cart().await;
    cart.lock().await.add_item(item("widget", dec!(50.00)), 2).await;

    let pricing = PricingConfig::default();
    let expected = cart.lock().await.totals(&pricing);

    let handoff = InMemoryHandoff::new();
    let engine = CheckoutEngine::new(pricing, Box::new(handoff.clone()));
    let record = engine
        .submit(&cart, &billing(), PaymentMode::Simulated)
        .await
        .unwrap();

    assert_eq!(record.totals, expected);

    // Later cart mutations must not retroactively change the handed-off record.
    cart.lock().await.add_item(item("gizmo", dec!(9.99)), 5).await;
    let taken = handoff.take().await.unwrap().unwrap();
    assert_eq!(taken.totals, expected);
    assert_eq!(taken.lines.len(), 1);
}

#[tokio::test]
async fn test_failed_attempt_can_be_retried() {
    let cart = shared_cart().await;
    cart.lock().await.add_item(item("widget", dec!(10.00)), 1).await;

    let handoff = InMemoryHandoff::new();
    let engine = CheckoutEngine::new(PricingConfig::default(), Box::new(handoff.clone()))
        .with_gateway(Box::new(StaticGateway))
        .with_backend(Box::new(FlakyBackend {
            attempts: Arc::new(Mutex::new(0)),
        }));

    let first = engine
        .submit(&cart, &billing(), PaymentMode::Live(card()))
        .await;
    assert!(matches!(first, Err(StorefrontError::OrderRejected(_))));
    assert_eq!(engine.phase().await, CheckoutPhase::Idle);
    assert!(!cart.lock().await.state().is_empty());
    assert!(handoff.take().await.unwrap().is_none());

    // Back in Idle, the shopper may resubmit.
    let second = engine
        .submit(&cart, &billing(), PaymentMode::Live(card()))
        .await
        .unwrap();
    assert_eq!(second.order_id, "ORD-RETRY");
    assert!(cart.lock().await.state().is_empty());
}

#[tokio::test]
async fn test_promo_discount_travels_into_record() {
    let cart = shared_cart().await;
    {
        let mut cart = cart.lock().await;
        cart.add_item(item("widget", dec!(100.00)), 2).await;
        cart.set_promo_code("SAVE10").await;
    }

    let engine = CheckoutEngine::new(
        PricingConfig::default(),
        Box::new(InMemoryHandoff::new()),
    );
    let record = engine
        .submit(&cart, &billing(), PaymentMode::Simulated)
        .await
        .unwrap();

    assert_eq!(record.totals.discount, Money::new(dec!(20.0)));
    assert_eq!(
        record.totals.total,
        record.totals.subtotal + record.totals.shipping + record.totals.tax
            - record.totals.discount
    );
}

#[tokio::test]
async fn test_record_is_json_portable() {
    let cart = shared_cart().await;
    cart.lock().await.add_item(item("widget", dec!(50.00)), 2).await;

    let engine = CheckoutEngine::new(
        PricingConfig::default(),
        Box::new(InMemoryHandoff::new()),
    );
    let record = engine
        .submit(&cart, &billing(), PaymentMode::Simulated)
        .await
        .unwrap();

    // The record crosses a navigation boundary as JSON.
    let json = serde_json::to_string(&record).unwrap();
    let restored: OrderRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, record);
}
