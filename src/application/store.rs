use crate::domain::cart::{CartState, DeliveryMethod, ItemDetails};
use crate::domain::ports::CartStorageBox;
use crate::domain::pricing::{self, OrderTotals, PricingConfig};

/// The single source of truth for basket contents and checkout preferences.
///
/// Constructed explicitly with its persistence port and owned by the
/// application for its whole lifecycle; there is no ambient global cart.
/// Every mutation is written through to the port, but a failed write never
/// blocks the in-memory mutation: the session state stays authoritative and
/// the failure is logged.
pub struct CartStore {
    state: CartState,
    storage: CartStorageBox,
}

impl CartStore {
    /// Creates an empty store on top of a persistence port.
    pub fn new(storage: CartStorageBox) -> Self {
        Self {
            state: CartState::default(),
            storage,
        }
    }

    /// Restores the cart persisted by a previous session. A missing or
    /// unreadable blob starts an empty cart rather than failing startup.
    pub async fn load(storage: CartStorageBox) -> Self {
        let state = match storage.load().await {
            Ok(Some(state)) => state,
            Ok(None) => CartState::default(),
            Err(error) => {
                tracing::warn!(%error, "could not restore persisted cart; starting empty");
                CartState::default()
            }
        };
        Self { state, storage }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Fresh totals for the current contents.
    pub fn totals(&self, config: &PricingConfig) -> OrderTotals {
        pricing::totals(&self.state, config)
    }

    pub async fn add_item(&mut self, details: ItemDetails, quantity: u32) {
        self.state.add_item(details, quantity);
        self.persist().await;
    }

    pub async fn remove_item(&mut self, id: &str) {
        self.state.remove_item(id);
        self.persist().await;
    }

    /// Replaces a row's quantity. Quantities below 1 and unknown ids are
    /// rejected as a no-op and skip persistence.
    pub async fn update_quantity(&mut self, id: &str, quantity: u32) -> bool {
        let changed = self.state.update_quantity(id, quantity);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.state.set_delivery_method(method);
        self.persist().await;
    }

    pub async fn update_item_delivery_method(&mut self, id: &str, method: DeliveryMethod) -> bool {
        let changed = self.state.update_item_delivery_method(id, method);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn set_promo_code(&mut self, code: impl Into<String>) {
        self.state.set_promo_code(code);
        self.persist().await;
    }

    /// Empties items and promo code; the default delivery method survives.
    pub async fn clear(&mut self) {
        self.state.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        if let Err(error) = self.storage.save(&self.state).await {
            tracing::warn!(%error, "failed to persist cart; in-memory state remains authoritative");
        }
    }
}
