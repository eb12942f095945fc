//! Repository trait definitions (Ports)
//!
//! These traits define the storage interface for checkout orders.
//! Implementations can be PostgreSQL, in-memory, or mock for testing.

use crate::error::StoreError;
use async_trait::async_trait;
use cielo_domain::{CheckoutOrder, OrderId, PayableRef, PaymentStatus};
use serde_json::Value;

/// A unit of work over the checkout order table.
///
/// Writes made through a transaction only become visible after `commit`.
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Insert a new order for `payable` and return it with its generated id
    async fn insert(&mut self, payable: &PayableRef) -> Result<CheckoutOrder, StoreError>;

    /// Store the serialized request body on an existing order
    async fn update_body(&mut self, order_id: OrderId, body: &Value) -> Result<(), StoreError>;

    /// Make all writes visible
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard all writes
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Store for checkout orders
#[async_trait]
pub trait CheckoutOrderStore: Send + Sync {
    /// Begin a transaction
    async fn begin<'a>(&'a self) -> Result<Box<dyn OrderTransaction + 'a>, StoreError>;

    /// Find an order by ID
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>, StoreError>;

    /// Find all orders created for a payable, newest first
    async fn find_by_payable(&self, payable: &PayableRef) -> Result<Vec<CheckoutOrder>, StoreError>;

    /// Store a payment notification and its status, returning the updated order
    ///
    /// Fails with `StoreError::OrderNotFound` if the order does not exist.
    async fn record_notification(
        &self,
        order_id: OrderId,
        notification: &Value,
        status: PaymentStatus,
    ) -> Result<CheckoutOrder, StoreError>;
}
