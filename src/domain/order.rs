use crate::domain::cart::{CartItem, DeliveryMethod, Money};
use crate::domain::pricing::OrderTotals;
use crate::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};

/// Shopper identity and address used to authorize payment and populate the
/// order. Collected by a form collaborator; the core only checks that the
/// required fields are present before anything leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

impl BillingInfo {
    /// Structural validation: every required field must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("region", &self.region),
            ("postal_code", &self.postal_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StorefrontError::Validation(format!(
                    "billing field `{field}` is required"
                )));
            }
        }
        Ok(())
    }
}

/// Card details handed to the payment gateway on the live path. Never sent
/// to the order backend; only the resulting token is.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

/// Single-use payment method reference returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentToken(pub String);

/// Which checkout path to take, chosen by the caller at submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMode {
    /// Bypasses the payment collaborators and synthesizes an order id.
    Simulated,
    /// Tokenizes the card through the gateway, then creates a real order.
    Live(CardDetails),
}

/// A confirmed line item, frozen independently of later cart mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
    pub line_total: Money,
}

impl OrderLine {
    pub fn from_item(item: &CartItem) -> Self {
        Self {
            item_id: item.id.clone(),
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Shipping-line metadata sent with the order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub method: DeliveryMethod,
    pub fee: Money,
}

/// The order-creation request submitted to the commerce backend.
/// Shipping mirrors billing in the minimal case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment_token: PaymentToken,
    pub billing: BillingInfo,
    pub shipping: BillingInfo,
    pub lines: Vec<OrderLine>,
    pub shipping_line: ShippingLine,
    pub totals: OrderTotals,
}

/// Successful response from the commerce backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: String,
}

/// The immutable snapshot produced at the moment a checkout succeeds.
/// Written once to the handoff channel and consumed once by the
/// confirmation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub billing: BillingInfo,
    pub placed_at_ms: u64,
    pub simulated: bool,
}
