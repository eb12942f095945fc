//! Value Objects for the Cielo Checkout domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Amount must be non-negative with at most two decimal places
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Percentage must be within 0..=100
    #[error("Invalid percent: {0}")]
    InvalidPercent(String),

    /// Quantity must be positive
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Required text field was empty
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Payable reference is malformed
    #[error("Invalid payable reference: {0}")]
    InvalidPayable(String),

    /// Payment status code not recognized
    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),
}

// =============================================================================
// Amount
// =============================================================================

/// Amount represents a monetary value in the merchant's currency.
///
/// The Checkout API expects amounts as integer cents, so an `Amount` is kept
/// in cents and serializes as a plain integer (`12.50` becomes `1250`).
///
/// # Invariants
/// - Must be >= 0
/// - At most two decimal places
/// - Value in cents fits in a `u64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Create a new Amount with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidAmount` if value < 0, has sub-cent precision
    /// or does not fit in `u64` cents
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < Decimal::ZERO {
            return Err(DomainError::InvalidAmount("Amount must not be negative".to_string()));
        }
        if value.normalize().scale() > 2 {
            return Err(DomainError::InvalidAmount(format!(
                "Amount {} has more than two decimal places",
                value
            )));
        }

        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_u64())
            .ok_or_else(|| DomainError::InvalidAmount(format!("Amount {} is out of range", value)))?;

        Ok(Self(cents))
    }

    /// Create an Amount from integer cents
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self(0)
    }

    /// Value in currency units
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }

    /// Value in integer cents, as sent over the wire
    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_decimal())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cents = u64::deserialize(deserializer)?;
        Ok(Self::from_cents(cents))
    }
}

// =============================================================================
// Percent
// =============================================================================

/// Whole-number percentage, used for discounts.
///
/// # Invariants
/// - 0 <= value <= 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    /// Create a new Percent with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPercent` if value > 100
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value > 100 {
            return Err(DomainError::InvalidPercent(format!("{} is above 100", value)));
        }
        Ok(Self(value))
    }

    /// Get the underlying value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// PayableRef
// =============================================================================

/// Tagged reference to the business entity a checkout order pays for
/// (an invoice, a cart, a subscription...).
///
/// The order only points at the payable; resolving it back to a record
/// is up to the host application.
///
/// # Invariants
/// - `owner_type` and `owner_id` are non-empty
/// - `owner_type` contains no ':'
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayableRef {
    owner_type: String,
    owner_id: String,
}

impl PayableRef {
    /// Create a payable reference
    ///
    /// # Examples
    /// ```
    /// # use cielo_domain::PayableRef;
    /// let payable = PayableRef::new("invoice", "42").unwrap();
    /// assert_eq!(payable.to_string(), "invoice:42");
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPayable` if either part is empty
    pub fn new(owner_type: impl Into<String>, owner_id: impl Into<String>) -> Result<Self, DomainError> {
        let owner_type = owner_type.into();
        let owner_id = owner_id.into();

        if owner_type.trim().is_empty() || owner_id.trim().is_empty() {
            return Err(DomainError::InvalidPayable(
                "Owner type and owner id must be non-empty".to_string(),
            ));
        }
        if owner_type.contains(':') {
            return Err(DomainError::InvalidPayable(format!(
                "Owner type must not contain ':': {}",
                owner_type
            )));
        }

        Ok(Self { owner_type, owner_id })
    }

    /// Type tag of the owning entity
    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    /// Identifier of the owning entity
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl fmt::Display for PayableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner_type, self.owner_id)
    }
}

// =============================================================================
// PaymentStatus
// =============================================================================

/// Payment status reported by Cielo notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment (boleto issued, etc.)
    Pending,
    /// Paid
    Paid,
    /// Denied by the issuer
    Denied,
    /// Boleto expired
    Expired,
    /// Voided
    Voided,
    /// Customer abandoned the checkout
    NotFinalized,
    /// Authorized, awaiting capture
    Authorized,
    /// Chargeback
    Chargeback,
}

impl PaymentStatus {
    /// Map a Cielo numeric status code
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPaymentStatus` for unknown codes
    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Pending),
            2 => Ok(Self::Paid),
            3 => Ok(Self::Denied),
            4 => Ok(Self::Expired),
            5 => Ok(Self::Voided),
            6 => Ok(Self::NotFinalized),
            7 => Ok(Self::Authorized),
            8 => Ok(Self::Chargeback),
            other => Err(DomainError::InvalidPaymentStatus(format!("Unknown status code: {}", other))),
        }
    }

    /// Cielo numeric status code
    pub fn code(&self) -> i64 {
        match self {
            Self::Pending => 1,
            Self::Paid => 2,
            Self::Denied => 3,
            Self::Expired => 4,
            Self::Voided => 5,
            Self::NotFinalized => 6,
            Self::Authorized => 7,
            Self::Chargeback => 8,
        }
    }

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Denied => "denied",
            Self::Expired => "expired",
            Self::Voided => "voided",
            Self::NotFinalized => "not_finalized",
            Self::Authorized => "authorized",
            Self::Chargeback => "chargeback",
        }
    }

    /// Whether the payment went through
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Authorized)
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "denied" => Ok(Self::Denied),
            "expired" => Ok(Self::Expired),
            "voided" => Ok(Self::Voided),
            "not_finalized" => Ok(Self::NotFinalized),
            "authorized" => Ok(Self::Authorized),
            "chargeback" => Ok(Self::Chargeback),
            other => Err(DomainError::InvalidPaymentStatus(format!("Unknown status: {}", other))),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_valid() {
        let amount = Amount::new(dec!(12.50)).unwrap();
        assert_eq!(amount.as_decimal(), dec!(12.50));
        assert_eq!(amount.cents(), 1250);
        assert_eq!(amount.to_string(), "12.50");
    }

    #[test]
    fn test_amount_rejects_negative() {
        assert!(Amount::new(dec!(-0.01)).is_err());
        assert!(Amount::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_amount_rejects_values_beyond_u64_cents() {
        // 2e17 units is 2e19 cents, past u64::MAX
        assert!(matches!(
            Amount::new(dec!(200000000000000000)),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(Amount::new(Decimal::MAX).is_err());

        let largest = Amount::from_cents(u64::MAX);
        assert_eq!(Amount::new(largest.as_decimal()).unwrap(), largest);
        assert_eq!(serde_json::to_value(largest).unwrap(), serde_json::json!(u64::MAX));
    }

    #[test]
    fn test_amount_rejects_sub_cent_precision() {
        assert!(Amount::new(dec!(1.005)).is_err());
        // Trailing zeros are fine
        assert!(Amount::new(dec!(1.500)).is_ok());
    }

    #[test]
    fn test_amount_serializes_as_cents() {
        let amount = Amount::new(dec!(99.90)).unwrap();
        assert_eq!(serde_json::to_value(amount).unwrap(), serde_json::json!(9990));

        let back: Amount = serde_json::from_value(serde_json::json!(9990)).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_percent_bounds() {
        assert!(Percent::new(0).is_ok());
        assert!(Percent::new(100).is_ok());
        assert!(Percent::new(101).is_err());
        assert!(serde_json::from_value::<Percent>(serde_json::json!(150)).is_err());
    }

    #[test]
    fn test_payable_ref() {
        let payable = PayableRef::new("invoice", "42").unwrap();
        assert_eq!(payable.owner_type(), "invoice");
        assert_eq!(payable.owner_id(), "42");

        assert!(PayableRef::new("", "42").is_err());
        assert!(PayableRef::new("invoice", "  ").is_err());
        assert!(PayableRef::new("app:invoice", "42").is_err());
    }

    #[test]
    fn test_payment_status_codes() {
        for code in 1..=8 {
            let status = PaymentStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!(PaymentStatus::from_code(0).is_err());
        assert!(PaymentStatus::from_code(9).is_err());
    }

    #[test]
    fn test_payment_status_settled() {
        assert!(PaymentStatus::Paid.is_settled());
        assert!(PaymentStatus::Authorized.is_settled());
        assert!(!PaymentStatus::Denied.is_settled());
        assert!(!PaymentStatus::NotFinalized.is_settled());
    }
}
