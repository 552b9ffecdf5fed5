//! Discount value object and price math.
//!
//! Prices are whole minor currency units (i64); there is no fractional
//! currency anywhere in this domain.

use serde::{Deserialize, Serialize};

use super::PlanError;

/// How a plan's discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage off, 1 to 100.
    Percentage,

    /// Value is an absolute amount off in minor currency units, at least 1.
    Fixed,
}

/// A validated discount: type plus value.
///
/// Construction enforces the value range for the type, so every
/// `Discount` in the system can be applied without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    kind: DiscountType,
    value: i64,
}

impl Discount {
    /// Creates a percentage discount (1..=100 percent off).
    pub fn percentage(value: i64) -> Result<Self, PlanError> {
        if !(1..=100).contains(&value) {
            return Err(PlanError::invalid_discount(format!(
                "percentage must be between 1 and 100, got {}",
                value
            )));
        }
        Ok(Self {
            kind: DiscountType::Percentage,
            value,
        })
    }

    /// Creates a fixed discount (at least 1 minor currency unit off).
    pub fn fixed(value: i64) -> Result<Self, PlanError> {
        if value < 1 {
            return Err(PlanError::invalid_discount(format!(
                "fixed amount must be at least 1, got {}",
                value
            )));
        }
        Ok(Self {
            kind: DiscountType::Fixed,
            value,
        })
    }

    /// Creates a discount from its raw parts, validating the value range.
    pub fn new(kind: DiscountType, value: i64) -> Result<Self, PlanError> {
        match kind {
            DiscountType::Percentage => Self::percentage(value),
            DiscountType::Fixed => Self::fixed(value),
        }
    }

    /// The discount type.
    pub fn kind(&self) -> DiscountType {
        self.kind
    }

    /// The raw discount value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Computes the discounted price for an original price.
    ///
    /// Percentage discounts round half-up on the minor unit. Fixed
    /// discounts saturate at zero; a fixed amount at or above the price
    /// yields a discounted price of 0.
    pub fn price_after(&self, price: i64) -> i64 {
        match self.kind {
            DiscountType::Percentage => (price * (100 - self.value) + 50) / 100,
            DiscountType::Fixed => (price - self.value).max(0),
        }
    }
}
