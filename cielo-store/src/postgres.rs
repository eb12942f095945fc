//! PostgreSQL checkout order store.
//!
//! This module provides:
//! - `PgCheckoutStore` implementing `CheckoutOrderStore` over a `PgPool`
//! - `PgOrderTransaction` wrapping a `sqlx::Transaction`
//!
//! This module uses dynamic queries (sqlx::query) instead of compile-time
//! checked macros (sqlx::query!) to allow compilation without DATABASE_URL.

use crate::error::{is_unique_violation, StoreError};
use crate::repository::{CheckoutOrderStore, OrderTransaction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cielo_domain::{CheckoutOrder, OrderId, PayableRef, PaymentStatus};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const SELECT_ORDER: &str = r#"
    SELECT
        order_id,
        payable_type,
        payable_id,
        body,
        payment_status,
        notification,
        created_at,
        updated_at
    FROM checkout_orders
"#;

/// PostgreSQL adapter for the `checkout_orders` table.
pub struct PgCheckoutStore {
    /// PostgreSQL connection pool
    pool: Arc<PgPool>,
}

impl PgCheckoutStore {
    /// Create a new PostgreSQL checkout store.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (for testing).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Transaction over the `checkout_orders` table.
///
/// Dropping it without `commit` rolls back (sqlx semantics).
pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn insert(&mut self, payable: &PayableRef) -> Result<CheckoutOrder, StoreError> {
        let order = CheckoutOrder::new(payable.clone());

        sqlx::query(
            r#"
            INSERT INTO checkout_orders (
                order_id, payable_type, payable_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.order_id)
        .bind(order.payable.owner_type())
        .bind(order.payable.owner_id())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateOrder(order.order_id)
            } else {
                StoreError::from(e)
            }
        })?;

        debug!(order_id = %order.order_id, payable = %order.payable, "Inserted checkout order");
        Ok(order)
    }

    async fn update_body(&mut self, order_id: OrderId, body: &Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE checkout_orders
            SET body = $2, updated_at = NOW()
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(body)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(order_id));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl CheckoutOrderStore for PgCheckoutStore {
    async fn begin<'a>(&'a self) -> Result<Box<dyn OrderTransaction + 'a>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOrderTransaction { tx }))
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<CheckoutOrder>, StoreError> {
        let row = sqlx::query(&format!("{} WHERE order_id = $1", SELECT_ORDER))
            .bind(order_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.as_ref().map(parse_order_row).transpose()
    }

    async fn find_by_payable(&self, payable: &PayableRef) -> Result<Vec<CheckoutOrder>, StoreError> {
        let rows = sqlx::query(&format!(
            "{} WHERE payable_type = $1 AND payable_id = $2 ORDER BY created_at DESC, order_id DESC",
            SELECT_ORDER
        ))
        .bind(payable.owner_type())
        .bind(payable.owner_id())
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(parse_order_row).collect()
    }

    async fn record_notification(
        &self,
        order_id: OrderId,
        notification: &Value,
        status: PaymentStatus,
    ) -> Result<CheckoutOrder, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE checkout_orders
            SET notification = $2, payment_status = $3, updated_at = NOW()
            WHERE order_id = $1
            RETURNING
                order_id, payable_type, payable_id, body,
                payment_status, notification, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(notification)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(StoreError::OrderNotFound(order_id))?;

        parse_order_row(&row)
    }
}

/// Map a `checkout_orders` row to the domain entity.
fn parse_order_row(row: &sqlx::postgres::PgRow) -> Result<CheckoutOrder, StoreError> {
    let order_id: Uuid = row.try_get("order_id")?;
    let payable_type: String = row.try_get("payable_type")?;
    let payable_id: String = row.try_get("payable_id")?;
    let payment_status: Option<String> = row.try_get("payment_status")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let payable =
        PayableRef::new(payable_type, payable_id).map_err(|e| StoreError::corrupt_row(order_id, e))?;

    let payment_status = payment_status
        .map(|s| s.parse::<PaymentStatus>())
        .transpose()
        .map_err(|e| StoreError::corrupt_row(order_id, e))?;

    Ok(CheckoutOrder {
        order_id,
        payable,
        body: row.try_get("body")?,
        payment_status,
        notification: row.try_get("notification")?,
        created_at,
        updated_at,
    })
}
