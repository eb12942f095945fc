//! Cielo Checkout REST API Client
//!
//! Provides REST API integration for:
//! - Creating a hosted checkout order (`POST /orders`)
//! - Extracting the checkout redirect URL from the response
//!
//! # Authentication
//!
//! Cielo Checkout identifies the merchant through a `MerchantId` header.
//! No signature is involved.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Cielo Checkout public API base URL
pub const CIELO_API_URL: &str = "https://cieloecommerce.cielo.com.br/api/public/v1";

/// Order creation endpoint, relative to the base URL
pub const ORDER_ENDPOINT: &str = "/orders";

/// Default request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Header carrying the merchant identifier
const MERCHANT_ID_HEADER: &str = "MerchantId";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur in the Cielo REST client.
#[derive(Debug, Clone, Error)]
pub enum CieloRestError {
    /// HTTP request could not be completed (connection refused, TLS, DNS...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// API answered with a non-success status
    #[error("Cielo API error: {code} - {message}")]
    ApiError { code: u16, message: String },

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to encode the request body
    #[error("Failed to encode request: {0}")]
    EncodeError(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CieloRestError {
    /// Whether the failure happened at the transport/HTTP level,
    /// as opposed to encoding or decoding on our side.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CieloRestError::RequestFailed(_) | CieloRestError::ApiError { .. } | CieloRestError::Timeout
        )
    }

    /// HTTP status code, when the API answered at all
    pub fn code(&self) -> Option<u16> {
        match self {
            CieloRestError::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// =============================================================================
// Cielo REST Client
// =============================================================================

/// Cielo Checkout REST API client.
#[derive(Debug, Clone)]
pub struct CieloRestClient {
    /// HTTP client
    client: Client,
    /// Merchant identifier sent on every request
    merchant_id: String,
    /// API base URL, without trailing slash
    base_url: String,
    /// Per-request timeout
    request_timeout: Duration,
}

impl CieloRestClient {
    /// Create a new client against the production API.
    ///
    /// # Arguments
    ///
    /// * `merchant_id` - Cielo merchant identifier
    pub fn new(merchant_id: impl Into<String>) -> Self {
        Self::with_base_url(merchant_id, CIELO_API_URL)
    }

    /// Create a client against a custom base URL (sandbox, local double).
    pub fn with_base_url(merchant_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            merchant_id: merchant_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Get the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Send a JSON POST request and return the raw response body.
    ///
    /// `request_timeout` bounds the whole exchange, headers and body together.
    async fn post_json(&self, endpoint: &str, payload: Vec<u8>) -> Result<String, CieloRestError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let exchange = async {
            let response = self
                .client
                .post(&url)
                .header(MERCHANT_ID_HEADER, &self.merchant_id)
                .header(CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| CieloRestError::Timeout)?
            .map_err(|e| CieloRestError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            // Try to parse Cielo error response
            let message = match serde_json::from_str::<CieloErrorResponse>(&body) {
                Ok(err) => err.describe(),
                Err(_) => body,
            };
            return Err(CieloRestError::ApiError {
                code: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    // =========================================================================
    // Order API
    // =========================================================================

    /// Create a checkout order.
    ///
    /// # Arguments
    ///
    /// * `body` - Serialized `CartOrder`
    ///
    /// # Endpoint
    ///
    /// `POST /orders`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let response = client.create_order(&order.to_value()?).await?;
    /// println!("Redirect to: {}", response.checkout_url());
    /// ```
    pub async fn create_order(&self, body: &Value) -> Result<CheckoutResponse, CieloRestError> {
        let payload = serde_json::to_vec(body).map_err(|e| CieloRestError::EncodeError(e.to_string()))?;

        debug!(bytes = payload.len(), "Creating Cielo checkout order");
        let body = self.post_json(ORDER_ENDPOINT, payload).await?;

        serde_json::from_str(&body).map_err(|e| CieloRestError::ParseError(e.to_string()))
    }
}

// =============================================================================
// Cielo Types (from API responses)
// =============================================================================

/// Cielo error response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CieloErrorResponse {
    message: String,
    /// Field-level validation messages
    #[serde(default)]
    model_state: Option<HashMap<String, Vec<String>>>,
}

impl CieloErrorResponse {
    fn describe(&self) -> String {
        match &self.model_state {
            Some(fields) if !fields.is_empty() => {
                let mut details: Vec<String> = fields
                    .iter()
                    .map(|(field, errors)| format!("{}: {}", field, errors.join(", ")))
                    .collect();
                details.sort();
                format!("{} ({})", self.message, details.join("; "))
            },
            _ => self.message.clone(),
        }
    }
}

/// Order creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    pub settings: CheckoutSettings,
}

impl CheckoutResponse {
    /// URL the customer should be redirected to
    pub fn checkout_url(&self) -> &str {
        &self.settings.checkout_url
    }
}

/// Settings block of the order creation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSettings {
    /// Hosted checkout page
    pub checkout_url: String,
    /// Checkout profile configured for the merchant
    #[serde(default)]
    pub profile: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
