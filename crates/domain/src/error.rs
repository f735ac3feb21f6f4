//! Domain error types.

use common::{CategoryId, ItemId, OrderId};
use store::{OrderStatus, StoreError};
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced catalog item does not exist.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    /// Referenced category does not exist.
    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    /// Referenced order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// The order already carries a final status.
    #[error("order {order} already decided: {status}")]
    AlreadyDecided {
        order: OrderId,
        status: OrderStatus,
    },

    /// Checkout requires at least one cart line.
    #[error("cart is empty")]
    EmptyCart,

    /// Persisting a new order failed; the transaction wrote nothing.
    #[error("order creation failed: {0}")]
    OrderCreation(#[source] StoreError),

    /// An error occurred in the store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
