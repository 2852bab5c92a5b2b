use crate::domain::cart::CartState;
use crate::domain::order::OrderRecord;
use crate::domain::ports::{CartStorage, OrderHandoff};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory cart blob store.
///
/// `Clone` shares the underlying slot, which lets tests hold a handle and
/// inspect what the `CartStore` persisted. Ideal wherever durability across
/// process restarts is not required.
#[derive(Default, Clone)]
pub struct InMemoryCartStorage {
    blob: Arc<RwLock<Option<CartState>>>,
}

impl InMemoryCartStorage {
    /// Creates a new, empty storage slot.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStorage for InMemoryCartStorage {
    async fn save(&self, cart: &CartState) -> Result<()> {
        let mut blob = self.blob.write().await;
        *blob = Some(cart.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CartState>> {
        let blob = self.blob.read().await;
        Ok(blob.clone())
    }
}

/// An in-memory order handoff slot.
///
/// `publish` overwrites (write-once per attempt), `take` removes
/// (read-once by the confirmation consumer).
#[derive(Default, Clone)]
pub struct InMemoryHandoff {
    slot: Arc<RwLock<Option<OrderRecord>>>,
}

impl InMemoryHandoff {
    /// Creates a new, empty handoff slot.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderHandoff for InMemoryHandoff {
    async fn publish(&self, record: &OrderRecord) -> Result<()> {
        let mut slot = self.slot.write().await;
        *slot = Some(record.clone());
        Ok(())
    }

    async fn take(&self) -> Result<Option<OrderRecord>> {
        let mut slot = self.slot.write().await;
        Ok(slot.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{DeliveryMethod, ItemDetails, UnitPrice};
    use crate::domain::order::BillingInfo;
    use crate::domain::pricing::OrderTotals;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_in_memory_cart_storage() {
        let storage = InMemoryCartStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        let mut cart = CartState::default();
        cart.set_delivery_method(DeliveryMethod::Shipping);
        cart.add_item(
            ItemDetails {
                id: "widget".to_string(),
                name: "Widget".to_string(),
                unit_price: UnitPrice::new(dec!(10.00)).unwrap(),
                vendor_id: "vendor-1".to_string(),
                image: None,
                delivery_method: None,
                max_quantity: None,
                sku: None,
            },
            2,
        );

        storage.save(&cart).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(cart));
    }

    #[tokio::test]
    async fn test_handoff_is_read_once() {
        let handoff = InMemoryHandoff::new();
        let record = OrderRecord {
            order_id: "SIM-1".to_string(),
            lines: vec![],
            totals: OrderTotals::default(),
            billing: BillingInfo {
                name: "Ada Shopper".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                region: "OR".to_string(),
                postal_code: "97477".to_string(),
            },
            placed_at_ms: 0,
            simulated: true,
        };

        handoff.publish(&record).await.unwrap();
        assert_eq!(handoff.take().await.unwrap(), Some(record));
        assert_eq!(handoff.take().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_handoff_publish_overwrites() {
        let handoff = InMemoryHandoff::new();
        let mut record = OrderRecord {
            order_id: "SIM-1".to_string(),
            lines: vec![],
            totals: OrderTotals::default(),
            billing: BillingInfo {
                name: "Ada Shopper".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                region: "OR".to_string(),
                postal_code: "97477".to_string(),
            },
            placed_at_ms: 0,
            simulated: true,
        };

        handoff.publish(&record).await.unwrap();
        record.order_id = "SIM-2".to_string();
        handoff.publish(&record).await.unwrap();

        let taken = handoff.take().await.unwrap().unwrap();
        assert_eq!(taken.order_id, "SIM-2");
    }
}
