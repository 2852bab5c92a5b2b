use thiserror::Error;

/// Crate-wide error type.
///
/// The checkout variants carry the human-readable message the shopper sees;
/// the remaining variants wrap infrastructure failures from storage,
/// serialization and I/O.
#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("payment service has not been initialized")]
    GatewayUnavailable,
    #[error("payment declined: {0}")]
    PaymentDeclined(String),
    #[error("order was not accepted: {0}")]
    OrderRejected(String),
    #[error("a checkout is already in progress")]
    CheckoutInFlight,
    #[error("storage error: {0}")]
    Storage(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    RocksDb(#[from] rocksdb::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
