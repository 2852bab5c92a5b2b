use crate::domain::cart::CartState;
use crate::domain::order::OrderRecord;
use crate::domain::ports::{CART_KEY, CartStorage, OrderHandoff, PENDING_ORDER_KEY};
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for the persisted cart blob.
pub const CF_CART: &str = "cart";
/// Column Family for the pending order handoff record.
pub const CF_HANDOFF: &str = "handoff";

/// A persistent store implementation using RocksDB.
///
/// Holds both the cart blob and the order handoff record, each under its
/// fixed well-known key in a dedicated Column Family. Writes are
/// last-writer-wins, matching the shared-storage contract of the cart
/// persistence layer.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_cart = ColumnFamilyDescriptor::new(CF_CART, Options::default());
        let cf_handoff = ColumnFamilyDescriptor::new(CF_HANDOFF, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_cart, cf_handoff])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorefrontError::Storage(format!("column family `{name}` not found")))
    }
}

#[async_trait]
impl CartStorage for RocksDbStore {
    async fn save(&self, cart: &CartState) -> Result<()> {
        let cf = self.cf_handle(CF_CART)?;
        let value = serde_json::to_vec(cart)?;
        self.db.put_cf(cf, CART_KEY.as_bytes(), value)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<CartState>> {
        let cf = self.cf_handle(CF_CART)?;
        match self.db.get_cf(cf, CART_KEY.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderHandoff for RocksDbStore {
    async fn publish(&self, record: &OrderRecord) -> Result<()> {
        let cf = self.cf_handle(CF_HANDOFF)?;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(cf, PENDING_ORDER_KEY.as_bytes(), value)?;
        Ok(())
    }

    async fn take(&self) -> Result<Option<OrderRecord>> {
        let cf = self.cf_handle(CF_HANDOFF)?;
        match self.db.get_cf(cf, PENDING_ORDER_KEY.as_bytes())? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)?;
                self.db.delete_cf(cf, PENDING_ORDER_KEY.as_bytes())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
