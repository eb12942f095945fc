//! Domain Entities for Cielo Checkout
//!
//! The persisted record of a checkout attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::value_objects::{PayableRef, PaymentStatus};

/// Unique identifier for a checkout order
pub type OrderId = Uuid;

// =============================================================================
// CheckoutOrder
// =============================================================================

/// Local record of one checkout attempt.
///
/// Created before the request is sent so the generated id can be used as the
/// Cielo `OrderNumber`. `body` keeps the exact payload that was submitted;
/// `notification` and `payment_status` are filled later by payment
/// notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub order_id: OrderId,
    pub payable: PayableRef,
    pub body: Option<Value>,
    pub payment_status: Option<PaymentStatus>,
    pub notification: Option<Value>,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckoutOrder {
    /// Create a new order for a payable, with a fresh time-ordered id
    pub fn new(payable: PayableRef) -> Self {
        let now = Utc::now();
        Self {
            order_id: Uuid::now_v7(),
            payable,
            body: None,
            payment_status: None,
            notification: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Order number as sent to Cielo
    pub fn order_number(&self) -> String {
        self.order_id.to_string()
    }

    /// Record the request body that was (or is about to be) submitted
    pub fn attach_body(&mut self, body: Value) {
        self.body = Some(body);
        self.updated_at = Utc::now();
    }

    /// Record a payment notification and the status it carries
    pub fn record_notification(&mut self, notification: Value, status: PaymentStatus) {
        self.notification = Some(notification);
        self.payment_status = Some(status);
        self.updated_at = Utc::now();
    }

    /// Check if a notification has been received
    pub fn is_notified(&self) -> bool {
        self.notification.is_some()
    }
}
