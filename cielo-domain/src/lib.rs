//! Cielo Checkout Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the checkout request records, the `CartOrder` builder and the
//! persisted `CheckoutOrder` entity.

#![warn(clippy::all)]

// Public modules
pub mod cart_order;
pub mod checkout;
pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use cart_order::CartOrder;
pub use checkout::{
    Address, Cart, CartItem, Customer, Discount, ItemType, Payment, Shipping, ShippingService,
    ShippingType,
};
pub use entities::{CheckoutOrder, OrderId};
pub use value_objects::{Amount, DomainError, PayableRef, PaymentStatus, Percent};
