//! Cielo Checkout
//!
//! Builds a Cielo Checkout order, keeps a local record of the attempt and
//! returns the hosted checkout URL to redirect the customer to.
//!
//! # Components
//!
//! - **CheckoutService**: Orchestrates store transaction and API call
//! - **CheckoutGateway**: Port for the remote API (`CieloRestClient`, `StubGateway`)
//! - **CheckoutConfig**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cielo_checkout::{CheckoutConfig, CheckoutService};
//! use cielo_domain::{CartOrder, PayableRef};
//! use cielo_store::MemoryStore;
//!
//! let config = CheckoutConfig::from_env()?;
//! let service = CheckoutService::from_config(&config, Arc::new(MemoryStore::new()));
//!
//! let mut order = CartOrder::new();
//! order.set_soft_descriptor("MyStore").enable_antifraud();
//!
//! let url = service.request(&mut order, &PayableRef::new("invoice", "42")?).await?;
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod ports;
pub mod service;
pub mod stub;

// Re-exports for convenience
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use ports::CheckoutGateway;
pub use service::CheckoutService;
pub use stub::StubGateway;
