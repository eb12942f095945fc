//! Stub implementations for testing.
//!
//! Simulates the Cielo Checkout API without making real HTTP calls.

use async_trait::async_trait;
use cielo_connectors::{CheckoutResponse, CheckoutSettings, CieloRestError};
use serde_json::Value;
use std::sync::RwLock;

use crate::ports::CheckoutGateway;

// =============================================================================
// Stub Gateway
// =============================================================================

/// Stub gateway for testing.
///
/// Answers every order with `<checkout_base>/<OrderNumber>` and records the
/// bodies it received.
pub struct StubGateway {
    /// Prefix for generated checkout URLs
    checkout_base: String,
    /// Bodies received, in order
    requests: RwLock<Vec<Value>>,
    /// Error to return on the next call
    fail_next: RwLock<Option<CieloRestError>>,
}

impl StubGateway {
    /// Create a new stub gateway.
    pub fn new(checkout_base: impl Into<String>) -> Self {
        Self {
            checkout_base: checkout_base.into(),
            requests: RwLock::new(Vec::new()),
            fail_next: RwLock::new(None),
        }
    }

    /// Configure the next call to fail with `error`.
    pub fn set_fail_next(&self, error: CieloRestError) {
        let mut fail_next = self.fail_next.write().unwrap();
        *fail_next = Some(error);
    }

    /// Bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.read().unwrap().clone()
    }

    /// Number of calls received.
    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }

    /// URL the stub answers with for a given order number.
    pub fn checkout_url_for(&self, order_number: &str) -> String {
        format!("{}/{}", self.checkout_base, order_number)
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new("https://cieloecommerce.cielo.com.br/transactional/v2/checkout")
    }
}

#[async_trait]
impl CheckoutGateway for StubGateway {
    async fn create_order(&self, body: &Value) -> Result<CheckoutResponse, CieloRestError> {
        self.requests.write().unwrap().push(body.clone());

        // Take the injected failure, if any (one-shot)
        if let Some(error) = self.fail_next.write().unwrap().take() {
            return Err(error);
        }

        let order_number = body.get("OrderNumber").and_then(Value::as_str).unwrap_or_default();

        Ok(CheckoutResponse {
            settings: CheckoutSettings {
                checkout_url: self.checkout_url_for(order_number),
                profile: Some("CheckoutCielo".to_string()),
            },
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
