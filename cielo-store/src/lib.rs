//! Cielo Checkout Storage Layer
//!
//! Provides persistence for checkout orders.
//!
//! # Architecture
//!
//! - **Repository traits**: Define the storage interface (ports)
//! - **In-memory store**: Fast implementation for testing
//! - **PostgreSQL store**: Production implementation (feature `postgres`)
//!
//! # Usage
//!
//! ```rust
//! use cielo_store::{CheckoutOrderStore, MemoryStore};
//! use cielo_domain::PayableRef;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!     let payable = PayableRef::new("invoice", "42").unwrap();
//!
//!     let mut tx = store.begin().await.unwrap();
//!     let order = tx.insert(&payable).await.unwrap();
//!     tx.commit().await.unwrap();
//!
//!     let found = store.find_by_id(order.order_id).await.unwrap();
//!     assert!(found.is_some());
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PgCheckoutStore, PgOrderTransaction};
pub use repository::{CheckoutOrderStore, OrderTransaction};
