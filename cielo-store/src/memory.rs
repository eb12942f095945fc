//! In-memory store implementation
//!
//! Used for testing and development without a database.
//! Thread-safe using RwLock for concurrent access.
//!
//! Transactions stage their writes locally and apply them to the shared
//! map on commit, so an uncommitted order is never visible to readers.

use crate::error::StoreError;
use crate::repository::{CheckoutOrderStore, OrderTransaction};
use async_trait::async_trait;
use cielo_domain::{CheckoutOrder, OrderId, PayableRef, PaymentStatus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;

/// In-memory store for testing
pub struct MemoryStore {
    orders: RwLock<HashMap<OrderId, CheckoutOrder>>,
    /// Writes left before the injected failure (0 = none armed)
    fail_countdown: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            fail_countdown: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        }
    }

    /// Get the number of committed orders
    pub fn order_count(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    /// Number of committed transactions
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of rolled back transactions (explicit or on drop)
    pub fn rollback_count(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    /// Configure the next write (insert, body update, commit or notification) to fail.
    pub fn set_fail_next_write(&self, fail: bool) {
        self.set_fail_on_write(if fail { 1 } else { 0 });
    }

    /// Configure the `nth` write from now (1-based) to fail; 0 disarms.
    ///
    /// Within `request` the writes are insert (1), body update (2) and
    /// commit (3).
    pub fn set_fail_on_write(&self, nth: usize) {
        self.fail_countdown.store(nth, Ordering::SeqCst);
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.orders.write().unwrap().clear();
        self.fail_countdown.store(0, Ordering::SeqCst);
        self.commits.store(0, Ordering::SeqCst);
        self.rollbacks.store(0, Ordering::SeqCst);
    }

    /// Count a write against the armed failure, failing when it reaches this one.
    fn check_write(&self) -> Result<(), StoreError> {
        let previous = self
            .fail_countdown
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if previous == Ok(1) {
            return Err(StoreError::Database("Simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Transaction over a `MemoryStore`.
struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    /// Orders written in this transaction, in write order
    staged: Vec<CheckoutOrder>,
    finished: bool,
}

impl MemoryTransaction<'_> {
    fn staged_mut(&mut self, order_id: OrderId) -> Option<&mut CheckoutOrder> {
        self.staged.iter_mut().find(|o| o.order_id == order_id)
    }
}

#[async_trait]
impl<'a> OrderTransaction for MemoryTransaction<'a> {
    async fn insert(&mut self, payable: &PayableRef) -> Result<CheckoutOrder, StoreError> {
        self.store.check_write()?;

        let order = CheckoutOrder::new(payable.clone());
        self.staged.push(order.clone());
        Ok(order)
    }

    async fn update_body(&mut self, order_id: OrderId, body: &Value) -> Result<(), StoreError> {
        self.store.check_write()?;

        if let Some(order) = self.staged_mut(order_id) {
            order.attach_body(body.clone());
            return Ok(());
        }

        let committed = self.store.orders.read().unwrap().get(&order_id).cloned();
        match committed {
            Some(mut order) => {
                order.attach_body(body.clone());
                self.staged.push(order);
                Ok(())
            },
            None => Err(StoreError::OrderNotFound(order_id)),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut tx = self;
        // On failure the transaction is dropped unfinished, which rolls it back
        tx.store.check_write()?;

        let staged = std::mem::take(&mut tx.staged);
        {
            let mut orders = tx.store.orders.write().unwrap();
            for order in staged {
                orders.insert(order.order_id, order);
            }
        }
        tx.finished = true;
        tx.store.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let mut tx = self;
        tx.staged.clear();
        tx.finished = true;
        tx.store.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(discarded = self.staged.len(), "Memory transaction dropped without commit");
            self.store.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl CheckoutOrderStore for MemoryStore {
    async fn begin<'a>(&'a self) -> Result<Box<dyn OrderTransaction + 'a>, StoreError> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            staged: Vec::new(),
            finished: false,
        }))
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>, StoreError> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(&order_id).cloned())
    }

    async fn find_by_payable(&self, payable: &PayableRef) -> Result<Vec<CheckoutOrder>, StoreError> {
        let orders = self.orders.read().unwrap();
        let mut found: Vec<CheckoutOrder> =
            orders.values().filter(|o| &o.payable == payable).cloned().collect();
        found.sort_by(|a, b| (b.created_at, b.order_id).cmp(&(a.created_at, a.order_id)));
        Ok(found)
    }

    async fn record_notification(
        &self,
        order_id: OrderId,
        notification: &Value,
        status: PaymentStatus,
    ) -> Result<CheckoutOrder, StoreError> {
        self.check_write()?;

        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;

        order.record_notification(notification.clone(), status);
        Ok(order.clone())
    }
}
