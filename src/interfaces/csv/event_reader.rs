use crate::domain::cart::{DeliveryMethod, ItemDetails, UnitPrice};
use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// The operation a CSV row asks for.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Add,
    Remove,
    Qty,
    Delivery,
    ItemDelivery,
    Promo,
    Clear,
    Checkout,
}

/// One cart event row: `op, item, name, price, qty, vendor, method, code`.
/// Fields not used by an op may be left empty.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CartEvent {
    pub op: EventKind,
    pub item: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub qty: Option<u32>,
    pub vendor: Option<String>,
    pub method: Option<DeliveryMethod>,
    pub code: Option<String>,
}

impl CartEvent {
    /// Builds the catalog item an `add` row describes.
    pub fn item_details(&self) -> Result<ItemDetails> {
        let id = self.require("item", &self.item)?;
        let name = self.name.clone().unwrap_or_else(|| id.clone());
        let price = self
            .price
            .ok_or_else(|| StorefrontError::Validation("`price` is required for add".to_string()))?;
        Ok(ItemDetails {
            id,
            name,
            unit_price: UnitPrice::new(price)?,
            vendor_id: self.vendor.clone().unwrap_or_else(|| "local".to_string()),
            image: None,
            delivery_method: self.method,
            max_quantity: None,
            sku: None,
        })
    }

    /// The item id rows targeting a single row must carry.
    pub fn item_id(&self) -> Result<String> {
        self.require("item", &self.item)
    }

    fn require(&self, field: &str, value: &Option<String>) -> Result<String> {
        value
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorefrontError::Validation(format!("`{field}` is required")))
    }
}

/// Reads cart events from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<CartEvent>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(self) -> impl Iterator<Item = Result<CartEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StorefrontError::from))
    }
}
