use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Represents a monetary value with 2 decimal places display precision.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific
/// rules and provide type safety for price calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

/// Represents a non-negative per-unit price.
///
/// Ensures that catalog prices can never be negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    pub fn new(value: Decimal) -> Result<Self> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(StorefrontError::Validation(
                "unit price must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for UnitPrice {
    type Error = StorefrontError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UnitPrice> for Money {
    fn from(price: UnitPrice) -> Self {
        Self(price.0)
    }
}

/// How an item reaches the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
    Shipping,
}

/// A catalog item as handed to the cart by the product pages.
///
/// Quantity lives on the cart row, not here; `delivery_method` is `None` when
/// the item has no per-item override and should inherit the cart default.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub id: String,
    pub name: String,
    pub unit_price: UnitPrice,
    pub vendor_id: String,
    pub image: Option<String>,
    pub delivery_method: Option<DeliveryMethod>,
    pub max_quantity: Option<u32>,
    pub sku: Option<String>,
}

/// A single cart row. Owned exclusively by the cart; mutated only through
/// [`CartState`] operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub unit_price: UnitPrice,
    pub vendor_id: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub delivery_method: DeliveryMethod,
    pub max_quantity: Option<u32>,
    pub sku: Option<String>,
}

impl CartItem {
    /// Price of the whole row.
    pub fn line_total(&self) -> Money {
        Money::from(self.unit_price) * self.quantity
    }
}

/// The basket contents plus checkout-relevant preferences.
///
/// Item order is insertion order and carries no meaning beyond display.
/// Invariants: item ids are unique and every quantity is at least 1.
/// The serialized layout (`items`, `delivery_method`, `promo_code`) is the
/// persisted cart format and must stay stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub delivery_method: DeliveryMethod,
    pub promo_code: String,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Adds `quantity` units of an item. If a row with the same id already
    /// exists its quantity is incremented; no duplicate rows are created.
    /// New rows without a per-item override inherit the cart default
    /// delivery method. Stock ceilings are a caller concern and are not
    /// enforced here.
    pub fn add_item(&mut self, details: ItemDetails, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == details.id) {
            existing.quantity += quantity;
            return;
        }
        let delivery_method = details.delivery_method.unwrap_or(self.delivery_method);
        self.items.push(CartItem {
            id: details.id,
            name: details.name,
            unit_price: details.unit_price,
            vendor_id: details.vendor_id,
            image: details.image,
            quantity,
            delivery_method,
            max_quantity: details.max_quantity,
            sku: details.sku,
        });
    }

    /// Deletes the row with the given id. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Replaces the quantity for a row. Quantities below 1 are rejected as a
    /// no-op; removal goes through [`CartState::remove_item`] instead.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Sets the cart-wide default delivery method for rows added later.
    /// Rows that already carry their own method are not rewritten.
    pub fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.delivery_method = method;
    }

    /// Sets the per-item delivery override. Returns whether a row matched.
    pub fn update_item_delivery_method(&mut self, id: &str, method: DeliveryMethod) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.delivery_method = method;
                true
            }
            None => false,
        }
    }

    /// Stores the promo code verbatim, replacing any previous one.
    /// Normalization happens at pricing time, not here.
    pub fn set_promo_code(&mut self, code: impl Into<String>) {
        self.promo_code = code.into();
    }

    /// Empties the basket and drops the promo code. The default delivery
    /// method is a sticky preference and survives.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo_code.clear();
    }
}
