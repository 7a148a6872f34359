use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::{OrderId, ProductId};

/// Errors raised by the catalog store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock for \"{name}\": requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Catalog unavailable: {0}")]
    Unavailable(#[from] FrameworkError),
}

/// Errors raised by the order ledger.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),
    #[error("Ledger unavailable: {0}")]
    Unavailable(#[from] FrameworkError),
}

/// Every way placing or updating an order can be rejected. Each variant is
/// distinct so the caller can tell the customer which field or product to fix.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Missing customer or delivery information: {0}")]
    MissingField(&'static str),
    #[error("The cart is empty")]
    EmptyCart,
    #[error("A delivery address is required when shipping to an address")]
    MissingDeliveryAddress,
    #[error("Invalid cart line at position {index}")]
    InvalidLineItem { index: usize },
    #[error("Product not found: {id}")]
    ProductNotFound { id: ProductId },
    #[error("Insufficient stock for \"{name}\" (available: {available})")]
    InsufficientStock { name: String, available: u32 },
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Order total is too large to represent")]
    TotalOverflow,
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => OrderError::ProductNotFound { id },
            CatalogError::InsufficientStock { name, available, .. } => {
                OrderError::InsufficientStock { name, available }
            }
            other => OrderError::StorageFailure(other.to_string()),
        }
    }
}

impl From<LedgerError> for OrderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => OrderError::OrderNotFound(id),
            other => OrderError::StorageFailure(other.to_string()),
        }
    }
}
