//! Product price store port.
//!
//! The only product state this subsystem may touch: the original `price`
//! (read-only here), the effective `discounted_price`, and the owning
//! `plan_id`. Every write to the discount columns in the whole system
//! goes through this port so the discounted-iff-owned invariant survives.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId, ProductId};
use crate::domain::plans::ProductPricing;

/// Port for reading prices and mutating the discount columns.
#[async_trait]
pub trait ProductPriceStore: Send + Sync {
    /// The product's original price in minor currency units.
    ///
    /// Returns `None` if the product no longer exists; callers skip such
    /// products with a warning rather than aborting a plan transition.
    async fn price_of(&self, product_id: ProductId) -> Result<Option<i64>, DomainError>;

    /// The full pricing view of a product, or `None` if it is gone.
    async fn pricing_of(&self, product_id: ProductId)
        -> Result<Option<ProductPricing>, DomainError>;

    /// Set a product's discounted price and record `owner` as the plan
    /// responsible for it, overwriting any previous owner.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the product does not exist
    /// - `DatabaseError` on persistence failure
    async fn set_discount(
        &self,
        product_id: ProductId,
        discounted_price: i64,
        owner: PlanId,
    ) -> Result<(), DomainError>;

    /// Clear `discounted_price` and `plan_id` only if `plan_id` currently
    /// equals `plan`. Returns true if a discount was cleared, false if
    /// the product was owned by someone else, undiscounted, or missing.
    async fn clear_discount_if_owned_by(
        &self,
        product_id: ProductId,
        plan: PlanId,
    ) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_price_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ProductPriceStore) {}
    }
}
