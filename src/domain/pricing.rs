//! Pure price derivation over the current cart contents.
//!
//! Nothing here has side effects or storage of its own: the same
//! [`CartState`] and [`PricingConfig`] always produce the same
//! [`OrderTotals`].

use crate::domain::cart::{CartState, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A discount rule attached to a promo code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoRule {
    /// Percentage of the subtotal, e.g. `Percent(dec!(10))` is 10% off.
    Percent(Decimal),
    /// Literal amount off.
    Fixed(Decimal),
}

/// Injected pricing configuration: shipping rules, tax rate and the promo
/// table. Swappable per environment; the default matches the demo
/// storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
    /// Flat tax rate applied to the subtotal only, e.g. `0.08` for 8%.
    pub tax_rate: Decimal,
    /// Promo table keyed by the normalized (trimmed, uppercased) code.
    pub promos: HashMap<String, PromoRule>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let mut promos = HashMap::new();
        promos.insert("SAVE10".to_string(), PromoRule::Percent(dec!(10)));
        promos.insert("FLAT50".to_string(), PromoRule::Fixed(dec!(50)));
        Self {
            free_shipping_threshold: Money::new(dec!(500)),
            flat_shipping_fee: Money::new(dec!(25)),
            tax_rate: dec!(0.08),
            promos,
        }
    }
}

/// Derived order amounts. Never stored independently of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

/// Computes the totals for a cart.
///
/// Rules: subtotal is the sum of line totals; shipping is waived above the
/// free-shipping threshold, otherwise the flat fee (an empty cart owes
/// nothing); tax applies to the subtotal only. An unknown promo code yields
/// zero discount rather than an error. The reported discount is clamped so
/// that `total == subtotal + shipping + tax - discount` holds with a
/// non-negative total.
pub fn totals(cart: &CartState, config: &PricingConfig) -> OrderTotals {
    if cart.is_empty() {
        return OrderTotals::default();
    }

    let subtotal = cart
        .items
        .iter()
        .fold(Money::ZERO, |acc, item| acc + item.line_total());

    let shipping = if subtotal > config.free_shipping_threshold {
        Money::ZERO
    } else {
        config.flat_shipping_fee
    };

    let tax = Money::new(subtotal.value() * config.tax_rate);

    let gross = subtotal + shipping + tax;
    let discount = clamp(discount_for(cart, config, subtotal), gross);
    let total = gross - discount;

    OrderTotals {
        subtotal,
        shipping,
        tax,
        discount,
        total,
    }
}

fn discount_for(cart: &CartState, config: &PricingConfig, subtotal: Money) -> Money {
    let code = cart.promo_code.trim().to_uppercase();
    if code.is_empty() {
        return Money::ZERO;
    }
    match config.promos.get(&code) {
        Some(PromoRule::Percent(rate)) => Money::new(subtotal.value() * rate / dec!(100)),
        Some(PromoRule::Fixed(amount)) => Money::new(*amount),
        None => Money::ZERO,
    }
}

fn clamp(discount: Money, gross: Money) -> Money {
    if discount > gross {
        gross
    } else if discount < Money::ZERO {
        Money::ZERO
    } else {
        discount
    }
}
