//! Cielo Checkout Connectors
//!
//! Adapter for the Cielo Checkout REST API.
//! Turns a serialized order into a hosted checkout session.

#![warn(clippy::all)]

// Public modules
pub mod cielo_rest;

// Re-exports
pub use cielo_rest::{
    CheckoutResponse, CheckoutSettings, CieloRestClient, CieloRestError, CIELO_API_URL,
    ORDER_ENDPOINT, REQUEST_TIMEOUT_SECS,
};
