//! Product pricing view and discount write records.
//!
//! The scheduler never sees whole products, only the three columns it is
//! allowed to touch: `price`, `discounted_price`, and the owning `plan_id`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, ProductId};

/// The discount-relevant slice of a product row.
///
/// # Invariants
///
/// - `discounted_price` is non-null iff `plan_id` is non-null
/// - at most one plan owns a product's discount at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPricing {
    /// Product this pricing belongs to.
    pub product_id: ProductId,

    /// Original price, authoritative, in minor currency units.
    pub price: i64,

    /// Currently effective discounted price, or None when no discount
    /// applies.
    pub discounted_price: Option<i64>,

    /// Plan currently responsible for `discounted_price`, or None.
    pub plan_id: Option<PlanId>,
}

impl ProductPricing {
    /// Creates an undiscounted pricing view.
    pub fn undiscounted(product_id: ProductId, price: i64) -> Self {
        Self {
            product_id,
            price,
            discounted_price: None,
            plan_id: None,
        }
    }

    /// Returns true if some plan currently owns this product's discount.
    pub fn is_discounted(&self) -> bool {
        self.plan_id.is_some()
    }

    /// Returns true if the given plan owns this product's discount.
    pub fn owned_by(&self, plan: PlanId) -> bool {
        self.plan_id == Some(plan)
    }

    /// Checks the discounted-iff-owned invariant.
    pub fn invariant_holds(&self) -> bool {
        self.discounted_price.is_some() == self.plan_id.is_some()
    }

    /// The price a customer pays right now.
    pub fn effective_price(&self) -> i64 {
        self.discounted_price.unwrap_or(self.price)
    }
}

/// One product write computed during plan activation: the discounted
/// price this plan assigns to the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductDiscount {
    pub product_id: ProductId,
    pub discounted_price: i64,
}
