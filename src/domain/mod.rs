//! Domain layer: cart contents, price derivation, order snapshots and the
//! ports the application layer drives its collaborators through.

pub mod cart;
pub mod order;
pub mod ports;
pub mod pricing;
