//! Checkout configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{CheckoutError, CheckoutResult};
use cielo_connectors::{CIELO_API_URL, REQUEST_TIMEOUT_SECS};
use std::env;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Cielo Checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Merchant identifier sent as the `MerchantId` header
    pub merchant_id: String,

    /// API base URL (the order endpoint is appended)
    pub api_url: String,

    /// Timeout for the order creation request
    pub timeout: Duration,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CIELO_MERCHANT_ID` (required)
    /// - `CIELO_API_URL` (default: public production API)
    /// - `CIELO_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> CheckoutResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            merchant_id: "00000000-0000-0000-0000-000000000000".to_string(),
            api_url: "http://127.0.0.1:0".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    fn from_lookup<F>(lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let merchant_id = lookup("CIELO_MERCHANT_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CheckoutError::Config("CIELO_MERCHANT_ID is required".to_string()))?;

        let api_url = lookup("CIELO_API_URL").unwrap_or_else(|| CIELO_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(CheckoutError::Config(format!("Invalid CIELO_API_URL: {}", api_url)));
        }

        let timeout = match lookup("CIELO_TIMEOUT_SECS") {
            Some(val) => {
                let secs = val
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| CheckoutError::Config(format!("Invalid CIELO_TIMEOUT_SECS: {}", val)))?;
                Duration::from_secs(secs)
            },
            None => Duration::from_secs(REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            merchant_id,
            api_url,
            timeout,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[("CIELO_MERCHANT_ID", "m-1")])).unwrap();

        assert_eq!(config.merchant_id, "m-1");
        assert_eq!(config.api_url, CIELO_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[
            ("CIELO_MERCHANT_ID", "m-1"),
            ("CIELO_API_URL", "https://sandbox.example.com/api"),
            ("CIELO_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://sandbox.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_merchant_id() {
        let result = CheckoutConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(CheckoutError::Config(_))));

        let blank = CheckoutConfig::from_lookup(lookup_from(&[("CIELO_MERCHANT_ID", " ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_invalid_values() {
        let bad_timeout = CheckoutConfig::from_lookup(lookup_from(&[
            ("CIELO_MERCHANT_ID", "m-1"),
            ("CIELO_TIMEOUT_SECS", "soon"),
        ]));
        assert!(bad_timeout.is_err());

        let zero_timeout = CheckoutConfig::from_lookup(lookup_from(&[
            ("CIELO_MERCHANT_ID", "m-1"),
            ("CIELO_TIMEOUT_SECS", "0"),
        ]));
        assert!(zero_timeout.is_err());

        let bad_url = CheckoutConfig::from_lookup(lookup_from(&[
            ("CIELO_MERCHANT_ID", "m-1"),
            ("CIELO_API_URL", "ftp://example.com"),
        ]));
        assert!(bad_url.is_err());
    }

    #[test]
    fn test_test_config() {
        let config = CheckoutConfig::test();
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(!config.merchant_id.is_empty());
    }
}
