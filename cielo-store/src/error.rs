//! Storage layer errors

use cielo_domain::OrderId;
use thiserror::Error;

/// Errors that can occur while reading or writing checkout orders
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order with this id
    #[error("Checkout order not found: {0}")]
    OrderNotFound(OrderId),

    /// Order id already taken (primary key violation)
    #[error("Checkout order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// A stored row no longer maps to a valid `CheckoutOrder`
    #[error("Corrupt checkout order {order_id}: {reason}")]
    CorruptRow { order_id: OrderId, reason: String },

    /// Database rejected or failed the statement
    #[error("Database error: {0}")]
    Database(String),

    /// Database unreachable (pool exhausted, closed, I/O)
    #[error("Connection error: {0}")]
    Connection(String),
}

impl StoreError {
    /// Create a corrupt row error
    pub fn corrupt_row(order_id: OrderId, reason: impl ToString) -> Self {
        Self::CorruptRow {
            order_id,
            reason: reason.to_string(),
        }
    }

    /// Whether the order simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::OrderNotFound(_))
    }
}

/// SQLSTATE 23505
#[cfg(feature = "postgres")]
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            },
            sqlx::Error::Database(db_err) => StoreError::Database(db_err.to_string()),
            other => StoreError::Database(other.to_string()),
        }
    }
}
