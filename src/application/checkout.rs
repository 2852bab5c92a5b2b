use crate::application::store::CartStore;
use crate::domain::cart::DeliveryMethod;
use crate::domain::order::{
    BillingInfo, CardDetails, OrderLine, OrderRecord, OrderRequest, PaymentMode, ShippingLine,
};
use crate::domain::ports::{OrderBackendBox, OrderHandoffBox, PaymentGatewayBox};
use crate::domain::pricing::{OrderTotals, PricingConfig};
use crate::error::{Result, StorefrontError};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Cart handle shared between the UI event path and the checkout engine.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// Observable engine state. Success and failure both return the engine to
/// `Idle`; the outcome of an attempt is its returned `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Submitting,
}

const SIMULATED_PROCESSING_DELAY: Duration = Duration::from_millis(150);

/// Drives a purchase attempt: `Idle -> Submitting -> {record | error}`.
///
/// Exactly one attempt may be in flight at a time; a second submission while
/// `Submitting` fails immediately with [`StorefrontError::CheckoutInFlight`].
/// The cart lock is held only while validating, snapshotting and clearing,
/// never across the external payment calls; overlap is ruled out by the
/// phase guard instead.
///
/// On success the engine publishes the order record to the handoff channel
/// *before* clearing the cart, so a failed handoff write cannot lose the
/// confirmation data. No failure path mutates the cart.
pub struct CheckoutEngine {
    pricing: PricingConfig,
    handoff: OrderHandoffBox,
    gateway: Option<PaymentGatewayBox>,
    backend: Option<OrderBackendBox>,
    phase: Mutex<CheckoutPhase>,
}

impl CheckoutEngine {
    /// Creates an engine that can serve simulated checkouts. Live checkouts
    /// additionally need [`CheckoutEngine::with_gateway`] and
    /// [`CheckoutEngine::with_backend`].
    pub fn new(pricing: PricingConfig, handoff: OrderHandoffBox) -> Self {
        Self {
            pricing,
            handoff,
            gateway: None,
            backend: None,
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    pub fn with_gateway(mut self, gateway: PaymentGatewayBox) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_backend(mut self, backend: OrderBackendBox) -> Self {
        self.backend = Some(backend);
        self
    }

    pub async fn phase(&self) -> CheckoutPhase {
        *self.phase.lock().await
    }

    /// Runs one checkout attempt end to end.
    pub async fn submit(
        &self,
        cart: &SharedCart,
        billing: &BillingInfo,
        mode: PaymentMode,
    ) -> Result<OrderRecord> {
        self.begin().await?;
        let outcome = self.run_attempt(cart, billing, mode).await;
        *self.phase.lock().await = CheckoutPhase::Idle;

        match &outcome {
            Ok(record) => {
                tracing::info!(order_id = %record.order_id, simulated = record.simulated, "checkout succeeded")
            }
            Err(error) => tracing::warn!(%error, "checkout failed"),
        }
        outcome
    }

    async fn begin(&self) -> Result<()> {
        let mut phase = self.phase.lock().await;
        if *phase == CheckoutPhase::Submitting {
            return Err(StorefrontError::CheckoutInFlight);
        }
        *phase = CheckoutPhase::Submitting;
        Ok(())
    }

    async fn run_attempt(
        &self,
        cart: &SharedCart,
        billing: &BillingInfo,
        mode: PaymentMode,
    ) -> Result<OrderRecord> {
        billing.validate()?;

        // Snapshot under the cart lock; the external calls below run
        // without it.
        let (lines, totals, delivery_method) = {
            let cart = cart.lock().await;
            if cart.state().is_empty() {
                return Err(StorefrontError::Validation(
                    "cannot check out an empty cart".to_string(),
                ));
            }
            let lines: Vec<OrderLine> = cart.state().items.iter().map(OrderLine::from_item).collect();
            (lines, cart.totals(&self.pricing), cart.state().delivery_method)
        };

        let simulated = matches!(&mode, PaymentMode::Simulated);
        let order_id = match mode {
            PaymentMode::Simulated => self.authorize_simulated().await,
            PaymentMode::Live(card) => {
                self.authorize_live(billing, &card, &lines, &totals, delivery_method)
                    .await?
            }
        };

        let record = OrderRecord {
            order_id,
            lines,
            totals,
            billing: billing.clone(),
            placed_at_ms: unix_millis(),
            simulated,
        };

        // Handoff before clearing: the confirmation view must be able to
        // read the record even though the cart is about to be emptied.
        self.handoff.publish(&record).await?;
        cart.lock().await.clear().await;

        Ok(record)
    }

    /// The test path: no collaborators, a short artificial delay and a
    /// time-based locally-unique order id.
    async fn authorize_simulated(&self) -> String {
        tokio::time::sleep(SIMULATED_PROCESSING_DELAY).await;
        format!("SIM-{}", unix_millis())
    }

    async fn authorize_live(
        &self,
        billing: &BillingInfo,
        card: &CardDetails,
        lines: &[OrderLine],
        totals: &OrderTotals,
        delivery_method: DeliveryMethod,
    ) -> Result<String> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or(StorefrontError::GatewayUnavailable)?;
        let backend = self
            .backend
            .as_ref()
            .ok_or(StorefrontError::GatewayUnavailable)?;

        // A tokenization failure aborts before any order exists.
        let payment_token = gateway.tokenize(billing, card).await?;

        let request = OrderRequest {
            payment_token,
            billing: billing.clone(),
            // Shipping mirrors billing in the minimal case.
            shipping: billing.clone(),
            lines: lines.to_vec(),
            shipping_line: ShippingLine {
                method: delivery_method,
                fee: totals.shipping,
            },
            totals: *totals,
        };

        let receipt = backend.create_order(request).await?;
        Ok(receipt.order_id)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
