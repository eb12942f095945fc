//! Checkout error types.

use cielo_connectors::CieloRestError;
use cielo_domain::DomainError;
use cielo_store::StoreError;
use thiserror::Error;

/// Checkout-level errors.
///
/// Everything except `ServerError` and `InvalidNotification` wraps the
/// underlying error unchanged.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The checkout endpoint could not be reached or refused the request.
    /// Details are logged; callers only get a generic 500.
    #[error("Internal Server Error")]
    ServerError,

    /// Gateway failure that is not a transport error (e.g. unparseable response)
    #[error(transparent)]
    Gateway(#[from] CieloRestError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Notification payload is missing or has malformed fields
    #[error("Invalid notification: {0}")]
    InvalidNotification(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// HTTP status a web layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Domain(_) | CheckoutError::InvalidNotification(_) => 400,
            CheckoutError::Store(err) if err.is_not_found() => 404,
            _ => 500,
        }
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
