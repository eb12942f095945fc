//! Checkout request records
//!
//! Leaf records nested under a `CartOrder`: cart, shipping, payment and
//! customer. Field names follow the Cielo Checkout contract (PascalCase on
//! the wire). Unset fields are skipped, so a default record serializes to `{}`.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Amount, DomainError, Percent};

// =============================================================================
// Cart
// =============================================================================

/// Items being purchased plus an optional cart-wide discount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Append an item
    pub fn add_item(&mut self, item: CartItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Sum of unit price times quantity over all items, before discount
    ///
    /// # Errors
    /// Returns `DomainError::InvalidAmount` if the total does not fit in `u64` cents
    pub fn subtotal(&self) -> Result<Amount, DomainError> {
        self.items
            .iter()
            .try_fold(0u64, |total, item| {
                item.unit_price
                    .cents()
                    .checked_mul(u64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .map(Amount::from_cents)
            .ok_or_else(|| DomainError::InvalidAmount("Cart subtotal is out of range".to_string()))
    }
}

/// Kind of product, drives how Cielo handles delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    /// Physical goods
    #[default]
    Asset,
    /// Digital goods
    Digital,
    /// Services
    Service,
    /// Payments (bills, top-ups)
    Payment,
}

/// A single line in the cart.
///
/// # Invariants
/// - `name` is non-empty
/// - `quantity` > 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit_price: Amount,
    pub quantity: u32,
    #[serde(rename = "Type")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Weight in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl CartItem {
    /// Create a new item with validation
    ///
    /// # Errors
    /// Returns `DomainError::MissingField` for an empty name and
    /// `DomainError::InvalidQuantity` for a zero quantity
    pub fn new(name: impl Into<String>, unit_price: Amount, quantity: u32) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingField("item name".to_string()));
        }
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity("Item quantity must be positive".to_string()));
        }

        Ok(Self {
            name,
            description: None,
            unit_price,
            quantity,
            item_type: ItemType::default(),
            sku: None,
            weight: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_weight(mut self, grams: u32) -> Self {
        self.weight = Some(grams);
        self
    }
}

/// Cart-wide discount.
///
/// Serialized as `{"Type": "Amount", "Value": <cents>}` or
/// `{"Type": "Percent", "Value": <0..=100>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Value")]
pub enum Discount {
    Amount(Amount),
    Percent(Percent),
}

// =============================================================================
// Shipping
// =============================================================================

/// How the order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingType {
    /// Freight calculated by Correios
    Correios,
    /// Fixed freight chosen by the merchant
    FixedAmount,
    /// Free shipping
    Free,
    /// Customer picks the order up
    WithoutShippingPickUp,
    /// Nothing to deliver
    WithoutShipping,
}

/// Delivery details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shipping {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub shipping_type: Option<ShippingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ShippingService>,
}

impl Shipping {
    /// Add a selectable shipping service
    pub fn add_service(&mut self, service: ShippingService) -> &mut Self {
        self.services.push(service);
        self
    }
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
}

/// Shipping option offered to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShippingService {
    pub name: String,
    pub price: Amount,
    /// Delivery deadline in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u32>,
}

// =============================================================================
// Payment
// =============================================================================

/// Payment method settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boleto_discount: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_discount: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_installments: Option<u8>,
}

// =============================================================================
// Customer
// =============================================================================

/// Buyer data used to prefill the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    /// CPF or CNPJ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
