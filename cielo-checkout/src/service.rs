//! Checkout orchestration.
//!
//! `CheckoutService::request` ties the pieces together:
//!
//! ```text
//! begin tx → insert order → OrderNumber = order id → store body
//!          → POST /orders → commit → settings.checkoutUrl
//! ```
//!
//! Any failure rolls the transaction back. Transport failures are logged and
//! collapsed into `CheckoutError::ServerError`; everything else propagates
//! unchanged.

use std::sync::Arc;

use cielo_connectors::CieloRestClient;
use cielo_domain::{CartOrder, CheckoutOrder, OrderId, PayableRef, PaymentStatus};
use cielo_store::{CheckoutOrderStore, OrderTransaction};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::CheckoutGateway;

/// Creates Cielo checkout sessions and keeps a local record of each attempt.
pub struct CheckoutService<G: CheckoutGateway, S: CheckoutOrderStore> {
    gateway: Arc<G>,
    store: Arc<S>,
}

impl<S: CheckoutOrderStore> CheckoutService<CieloRestClient, S> {
    /// Build a service talking to the real Cielo API.
    pub fn from_config(config: &CheckoutConfig, store: Arc<S>) -> Self {
        let client = CieloRestClient::with_base_url(config.merchant_id.clone(), config.api_url.clone())
            .with_timeout(config.timeout);
        Self::new(Arc::new(client), store)
    }
}

impl<G: CheckoutGateway, S: CheckoutOrderStore> CheckoutService<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self { gateway, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Submit `cart_order` on behalf of `payable` and return the checkout URL.
    ///
    /// The order number of `cart_order` is overwritten with the id of the
    /// newly created order record.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::ServerError` if the checkout endpoint could not be
    ///   reached, timed out, or answered with an HTTP error
    /// - the original error for anything else (store, serialization,
    ///   malformed response)
    pub async fn request(&self, cart_order: &mut CartOrder, payable: &PayableRef) -> CheckoutResult<String> {
        let mut tx = self.store.begin().await?;

        match self.submit(tx.as_mut(), cart_order, payable).await {
            Ok((order_id, checkout_url)) => {
                tx.commit().await?;
                info!(%order_id, %payable, "Cielo checkout order created");
                Ok(checkout_url)
            },
            Err(CheckoutError::Gateway(err)) if err.is_transport() => {
                Self::rollback(tx, payable).await;
                // Event message is the gateway error itself
                error!(code = err.code().unwrap_or(0), message = %err, %payable);
                Err(CheckoutError::ServerError)
            },
            Err(err) => {
                Self::rollback(tx, payable).await;
                Err(err)
            },
        }
    }

    /// Steps of `request` that run inside the transaction.
    async fn submit(
        &self,
        tx: &mut (dyn OrderTransaction + '_),
        cart_order: &mut CartOrder,
        payable: &PayableRef,
    ) -> CheckoutResult<(OrderId, String)> {
        let order = tx.insert(payable).await?;

        cart_order.set_order_number(order.order_number());
        let body = cart_order.to_value()?;
        tx.update_body(order.order_id, &body).await?;

        let response = self.gateway.create_order(&body).await?;

        Ok((order.order_id, response.settings.checkout_url))
    }

    async fn rollback(tx: Box<dyn OrderTransaction + '_>, payable: &PayableRef) {
        // The original error wins over a failed rollback
        if let Err(e) = tx.rollback().await {
            warn!(error = %e, %payable, "Failed to roll back checkout order");
        }
    }

    /// Record a payment notification posted by Cielo.
    ///
    /// Reads `order_number` (the order id) and `payment_status` (numeric
    /// code, as number or string) from the payload and stores the payload
    /// and the mapped status on the order.
    pub async fn apply_notification(&self, payload: &Value) -> CheckoutResult<CheckoutOrder> {
        let order_id = notification_order_id(payload)?;
        let status = PaymentStatus::from_code(notification_status_code(payload)?)?;

        let order = self.store.record_notification(order_id, payload, status).await?;

        info!(%order_id, %status, payable = %order.payable, "Cielo payment notification recorded");
        Ok(order)
    }

    /// Find a checkout order by ID
    pub async fn find_order(&self, order_id: OrderId) -> CheckoutResult<Option<CheckoutOrder>> {
        Ok(self.store.find_by_id(order_id).await?)
    }

    /// All checkout attempts for a payable, newest first
    pub async fn orders_for(&self, payable: &PayableRef) -> CheckoutResult<Vec<CheckoutOrder>> {
        Ok(self.store.find_by_payable(payable).await?)
    }
}

fn notification_order_id(payload: &Value) -> CheckoutResult<OrderId> {
    let raw = payload
        .get("order_number")
        .and_then(Value::as_str)
        .ok_or_else(|| CheckoutError::InvalidNotification("missing order_number".to_string()))?;

    Uuid::parse_str(raw)
        .map_err(|_| CheckoutError::InvalidNotification(format!("invalid order_number: {}", raw)))
}

fn notification_status_code(payload: &Value) -> CheckoutResult<i64> {
    match payload.get("payment_status") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| CheckoutError::InvalidNotification(format!("invalid payment_status: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CheckoutError::InvalidNotification(format!("invalid payment_status: {}", s))),
        _ => Err(CheckoutError::InvalidNotification("missing payment_status".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_status_code_forms() {
        assert_eq!(notification_status_code(&json!({"payment_status": 2})).unwrap(), 2);
        assert_eq!(notification_status_code(&json!({"payment_status": "7"})).unwrap(), 7);
        assert!(notification_status_code(&json!({"payment_status": "paid"})).is_err());
        assert!(notification_status_code(&json!({"payment_status": 2.5})).is_err());
        assert!(notification_status_code(&json!({})).is_err());
    }

    #[test]
    fn test_notification_order_id() {
        let id = Uuid::now_v7();
        assert_eq!(notification_order_id(&json!({"order_number": id.to_string()})).unwrap(), id);
        assert!(notification_order_id(&json!({"order_number": "not-a-uuid"})).is_err());
        assert!(notification_order_id(&json!({"order_number": 42})).is_err());
    }
}
