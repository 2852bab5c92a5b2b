//! Application layer: the cart store with its write-through persistence and
//! the checkout engine that orchestrates a purchase attempt against the
//! payment and order-creation ports.

pub mod checkout;
pub mod store;
