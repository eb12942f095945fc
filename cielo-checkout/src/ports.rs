//! Checkout port definitions.
//!
//! Ports define the interfaces for external services (the Cielo API).
//! Adapters implement these ports for specific services (REST client, stub).

use async_trait::async_trait;
use cielo_connectors::{CheckoutResponse, CieloRestClient, CieloRestError};
use serde_json::Value;

// =============================================================================
// Checkout Gateway Port
// =============================================================================

/// Port for creating hosted checkout sessions.
///
/// Implementations:
/// - `CieloRestClient` - Real Cielo Checkout API
/// - `StubGateway` - For testing (canned URLs, injectable failures)
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Submit a serialized `CartOrder`.
    ///
    /// # Returns
    ///
    /// The parsed response holding `settings.checkoutUrl`. Errors for which
    /// `CieloRestError::is_transport` is true mean the request itself failed.
    async fn create_order(&self, body: &Value) -> Result<CheckoutResponse, CieloRestError>;
}

#[async_trait]
impl CheckoutGateway for CieloRestClient {
    async fn create_order(&self, body: &Value) -> Result<CheckoutResponse, CieloRestError> {
        CieloRestClient::create_order(self, body).await
    }
}
