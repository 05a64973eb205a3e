use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Errors returned by the checkout workflow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The requested product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product has fewer units available than requested.
    #[error(
        "insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// The conditional stock decrement did not apply. The order written
    /// in the first step has been rolled back.
    #[error("failed to update product quantity")]
    QuantityUpdateFailed,

    /// A storage operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
