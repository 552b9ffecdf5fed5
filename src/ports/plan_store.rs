//! Plan store port.
//!
//! Persistence contract for discount plans, their product membership,
//! and the atomic per-plan lifecycle commits.
//!
//! # Design
//!
//! The scheduler computes each plan's product writes up front, then hands
//! the whole batch to `commit_activation` / `commit_expiry`. Implementations
//! must apply the status flip and every product write as one atomic unit
//! (a database transaction, or a single locked mutation in memory), so a
//! half-discounted plan is never observable. The expiry ownership check
//! (`plan_id = this plan`) must be evaluated inside that same unit.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId, ProductId, Timestamp};
use crate::domain::plans::{DiscountPlan, ProductDiscount};

/// Repository port for DiscountPlan persistence.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert a newly created plan.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, plan: &DiscountPlan) -> Result<(), DomainError>;

    /// Find a plan by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<DiscountPlan>, DomainError>;

    /// All Scheduled plans whose `start_date <= now`, ordered by
    /// ascending `(start_date, id)`.
    ///
    /// The ordering makes the last-activated-wins rule deterministic when
    /// several plans claim the same product in one tick.
    async fn due_for_activation(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError>;

    /// All Active plans whose `end_date < now`, ordered by ascending
    /// `(end_date, id)`.
    async fn due_for_expiry(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError>;

    /// Product ids attached to a plan, regardless of plan status.
    async fn member_product_ids(&self, plan_id: PlanId) -> Result<Vec<ProductId>, DomainError>;

    /// Atomically flip a Scheduled plan to Active and write the given
    /// discounts, making the plan the owner of every listed product.
    /// `now` stamps the plan's `updated_at`.
    ///
    /// Existing discounts owned by other plans are overwritten
    /// (last-activated-wins).
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the plan is not Scheduled
    /// - `PlanNotFound` if the plan row is gone
    /// - `DatabaseError` on persistence failure; no partial effects remain
    async fn commit_activation(
        &self,
        plan_id: PlanId,
        discounts: &[ProductDiscount],
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Atomically flip an Active plan to Expired and clear
    /// `discounted_price` / `plan_id` on the listed products, but only
    /// where this plan is the recorded owner. Products claimed by another
    /// plan are left untouched. `now` stamps the plan's `updated_at`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the plan is not Active
    /// - `PlanNotFound` if the plan row is gone
    /// - `DatabaseError` on persistence failure; no partial effects remain
    async fn commit_expiry(
        &self,
        plan_id: PlanId,
        members: &[ProductId],
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Attach a product to a plan's membership. Idempotent; attaching an
    /// already-attached product is a no-op.
    async fn attach_product(&self, plan_id: PlanId, product_id: ProductId)
        -> Result<(), DomainError>;

    /// Detach a product from a plan's membership. Detaching a product
    /// that is not attached is a no-op.
    async fn detach_product(&self, plan_id: PlanId, product_id: ProductId)
        -> Result<(), DomainError>;

    /// Delete a plan and its membership rows.
    ///
    /// Callers must clear the plan's owned discounts first; see
    /// `DeletePlanHandler` for the two-step sequence.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the plan does not exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, plan_id: PlanId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn PlanStore) {}
    }
}
