use super::cart::CartState;
use super::order::{BillingInfo, CardDetails, OrderRecord, OrderReceipt, OrderRequest, PaymentToken};
use crate::error::Result;
use async_trait::async_trait;

/// Well-known key the persisted cart blob lives under.
pub const CART_KEY: &str = "cart";
/// Well-known key the pending order record lives under.
pub const PENDING_ORDER_KEY: &str = "pending_order";

/// Durable key-value persistence for the cart blob. Last-writer-wins; no
/// cross-process transactionality.
#[async_trait]
pub trait CartStorage: Send + Sync {
    async fn save(&self, cart: &CartState) -> Result<()>;
    async fn load(&self) -> Result<Option<CartState>>;
}

/// External payment tokenization collaborator. Bypassed entirely on the
/// simulated path.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn tokenize(&self, billing: &BillingInfo, card: &CardDetails) -> Result<PaymentToken>;
}

/// External order-creation collaborator.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn create_order(&self, request: OrderRequest) -> Result<OrderReceipt>;
}

/// Write-once-per-attempt, read-once channel carrying the completed order
/// record to the confirmation view.
#[async_trait]
pub trait OrderHandoff: Send + Sync {
    async fn publish(&self, record: &OrderRecord) -> Result<()>;
    /// Removes and returns the pending record, if any.
    async fn take(&self) -> Result<Option<OrderRecord>>;
}

pub type CartStorageBox = Box<dyn CartStorage>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type OrderBackendBox = Box<dyn OrderBackend>;
pub type OrderHandoffBox = Box<dyn OrderHandoff>;
