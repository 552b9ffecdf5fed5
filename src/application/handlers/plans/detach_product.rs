//! DetachProductHandler - removes a product from a plan's membership.
//!
//! Symmetric with attach: detaching from the plan that currently owns the
//! product's discount clears it immediately. The ownership check keeps a
//! discount claimed by a different plan intact.

use std::sync::Arc;

use crate::domain::foundation::{PlanId, ProductId};
use crate::domain::plans::PlanError;
use crate::ports::{PlanStore, ProductPriceStore};

/// Command to detach a product from a plan.
#[derive(Debug, Clone)]
pub struct DetachProductCommand {
    pub plan_id: PlanId,
    pub product_id: ProductId,
}

/// Result of a successful detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachProductResult {
    /// True if this plan owned the product's discount and it was cleared.
    pub discount_cleared: bool,
}

/// Handler for detaching products from plans.
pub struct DetachProductHandler {
    plans: Arc<dyn PlanStore>,
    products: Arc<dyn ProductPriceStore>,
}

impl DetachProductHandler {
    pub fn new(plans: Arc<dyn PlanStore>, products: Arc<dyn ProductPriceStore>) -> Self {
        Self { plans, products }
    }

    pub async fn handle(&self, cmd: DetachProductCommand) -> Result<DetachProductResult, PlanError> {
        let plan = self
            .plans
            .find_by_id(cmd.plan_id)
            .await?
            .ok_or_else(|| PlanError::not_found(cmd.plan_id))?;

        // Clearing first keeps the iff-invariant: a product is never left
        // discounted by a plan it no longer belongs to.
        let discount_cleared = self
            .products
            .clear_discount_if_owned_by(cmd.product_id, plan.id)
            .await?;

        self.plans.detach_product(plan.id, cmd.product_id).await?;

        if discount_cleared {
            tracing::info!(
                plan_id = %plan.id,
                product_id = %cmd.product_id,
                "cleared discount on detach"
            );
        }
        Ok(DetachProductResult { discount_cleared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDiscountStore;
    use crate::domain::foundation::{StoreId, Timestamp, UserId};
    use crate::domain::plans::{Discount, DiscountPlan, ProductPricing};

    fn base_time() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn active_plan() -> DiscountPlan {
        let now = base_time();
        let mut plan = DiscountPlan::create(
            PlanId::new(),
            StoreId::new(),
            "Member Prices",
            Discount::percentage(10).unwrap(),
            now.minus_days(1),
            now.plus_days(1),
            UserId::new(),
            now,
        )
        .unwrap();
        plan.activate(now).unwrap();
        plan
    }

    fn handler_over(store: Arc<InMemoryDiscountStore>) -> DetachProductHandler {
        DetachProductHandler::new(store.clone(), store)
    }

    #[tokio::test]
    async fn detach_clears_owned_discount() {
        let store = Arc::new(InMemoryDiscountStore::new());
        let plan = active_plan();
        store.insert(&plan).await.unwrap();

        let product = ProductId::new();
        store.insert_product(ProductPricing {
            product_id: product,
            price: 1_000,
            discounted_price: Some(900),
            plan_id: Some(plan.id),
        });
        store.attach_product(plan.id, product).await.unwrap();

        let result = handler_over(store.clone())
            .handle(DetachProductCommand {
                plan_id: plan.id,
                product_id: product,
            })
            .await
            .unwrap();

        assert!(result.discount_cleared);
        assert!(store.member_product_ids(plan.id).await.unwrap().is_empty());

        let pricing = store.product(product).unwrap();
        assert_eq!(pricing.discounted_price, None);
        assert_eq!(pricing.plan_id, None);
        assert!(pricing.invariant_holds());
    }

    #[tokio::test]
    async fn detach_leaves_discount_owned_by_other_plan() {
        let store = Arc::new(InMemoryDiscountStore::new());
        let plan = active_plan();
        let other = PlanId::new();
        store.insert(&plan).await.unwrap();

        let product = ProductId::new();
        store.insert_product(ProductPricing {
            product_id: product,
            price: 1_000,
            discounted_price: Some(800),
            plan_id: Some(other),
        });
        store.attach_product(plan.id, product).await.unwrap();

        let result = handler_over(store.clone())
            .handle(DetachProductCommand {
                plan_id: plan.id,
                product_id: product,
            })
            .await
            .unwrap();

        assert!(!result.discount_cleared);
        assert!(store.member_product_ids(plan.id).await.unwrap().is_empty());
        assert_eq!(store.product(product).unwrap().plan_id, Some(other));
        assert_eq!(store.product(product).unwrap().discounted_price, Some(800));
    }

    #[tokio::test]
    async fn detach_undiscounted_product_just_removes_membership() {
        let store = Arc::new(InMemoryDiscountStore::new());
        let plan = active_plan();
        store.insert(&plan).await.unwrap();

        let product = ProductId::new();
        store.insert_product(ProductPricing::undiscounted(product, 1_000));
        store.attach_product(plan.id, product).await.unwrap();

        let result = handler_over(store.clone())
            .handle(DetachProductCommand {
                plan_id: plan.id,
                product_id: product,
            })
            .await
            .unwrap();

        assert!(!result.discount_cleared);
        assert!(store.member_product_ids(plan.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detach_from_missing_plan_is_rejected() {
        let store = Arc::new(InMemoryDiscountStore::new());
        let result = handler_over(store)
            .handle(DetachProductCommand {
                plan_id: PlanId::new(),
                product_id: ProductId::new(),
            })
            .await;
        assert!(matches!(result, Err(PlanError::NotFound(_))));
    }
}
