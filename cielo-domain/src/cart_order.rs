//! CartOrder builder
//!
//! Aggregates the checkout records plus order-level fields into the request
//! body sent to `POST /orders`.
//!
//! Sub-records can be swapped wholesale (`set_cart`) or edited in place
//! (`configure_cart`); both return the builder for chaining.
//!
//! ```
//! # use cielo_domain::{Amount, CartItem, CartOrder};
//! let mut order = CartOrder::new();
//! order
//!     .set_soft_descriptor("MyStore")
//!     .configure_cart(|cart| {
//!         cart.add_item(CartItem::new("Mug", Amount::from_cents(2590), 1).unwrap());
//!     })
//!     .enable_antifraud();
//!
//! let body = order.to_value().unwrap();
//! assert_eq!(body["Cart"]["Items"][0]["UnitPrice"], 2590);
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::checkout::{Cart, Customer, Payment, Shipping};

/// Builder for a Checkout order request body.
///
/// `OrderNumber` and `SoftDescriptor` are always serialized (null when unset),
/// the four sub-records are always serialized, and `Options` only appears
/// once the antifraud flag has been set explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartOrder {
    order_number: Option<String>,
    soft_descriptor: Option<String>,
    cart: Cart,
    shipping: Shipping,
    payment: Payment,
    customer: Customer,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<CartOrderOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CartOrderOptions {
    antifraud_enabled: bool,
}

impl CartOrder {
    /// Create a builder with empty cart, shipping, payment and customer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merchant order number (the persisted order id)
    pub fn set_order_number(&mut self, order_number: impl Into<String>) -> &mut Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Set the label shown on the customer's card statement
    pub fn set_soft_descriptor(&mut self, soft_descriptor: impl Into<String>) -> &mut Self {
        self.soft_descriptor = Some(soft_descriptor.into());
        self
    }

    /// Replace the cart
    pub fn set_cart(&mut self, cart: Cart) -> &mut Self {
        self.cart = cart;
        self
    }

    /// Edit the current cart in place
    pub fn configure_cart<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cart),
    {
        configure(&mut self.cart);
        self
    }

    /// Replace the shipping details
    pub fn set_shipping(&mut self, shipping: Shipping) -> &mut Self {
        self.shipping = shipping;
        self
    }

    /// Edit the current shipping details in place
    pub fn configure_shipping<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Shipping),
    {
        configure(&mut self.shipping);
        self
    }

    /// Replace the payment settings
    pub fn set_payment(&mut self, payment: Payment) -> &mut Self {
        self.payment = payment;
        self
    }

    /// Edit the current payment settings in place
    pub fn configure_payment<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Payment),
    {
        configure(&mut self.payment);
        self
    }

    /// Replace the customer
    pub fn set_customer(&mut self, customer: Customer) -> &mut Self {
        self.customer = customer;
        self
    }

    /// Edit the current customer in place
    pub fn configure_customer<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Customer),
    {
        configure(&mut self.customer);
        self
    }

    /// Explicitly turn antifraud analysis on or off
    pub fn set_antifraud(&mut self, enabled: bool) -> &mut Self {
        self.options = Some(CartOrderOptions {
            antifraud_enabled: enabled,
        });
        self
    }

    pub fn enable_antifraud(&mut self) -> &mut Self {
        self.set_antifraud(true)
    }

    pub fn disable_antifraud(&mut self) -> &mut Self {
        self.set_antifraud(false)
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn soft_descriptor(&self) -> Option<&str> {
        self.soft_descriptor.as_deref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn shipping(&self) -> &Shipping {
        &self.shipping
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Antifraud flag, `None` if never set
    pub fn antifraud_enabled(&self) -> Option<bool> {
        self.options.map(|o| o.antifraud_enabled)
    }

    /// Serialize into the JSON object sent to the Checkout API
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
