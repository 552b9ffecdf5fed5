//! AttachProductHandler - adds a product to a plan's membership.
//!
//! Attaching to an Active plan applies the discount immediately, rather
//! than waiting for the next scheduler tick; the membership mutation is
//! itself the trigger.

use std::sync::Arc;

use crate::domain::foundation::{PlanId, ProductId};
use crate::domain::plans::{PlanError, PlanStatus};
use crate::ports::{PlanStore, ProductPriceStore};

/// Command to attach a product to a plan.
#[derive(Debug, Clone)]
pub struct AttachProductCommand {
    pub plan_id: PlanId,
    pub product_id: ProductId,
}

/// Result of a successful attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachProductResult {
    /// The discounted price applied right away, if the plan was Active.
    pub applied_price: Option<i64>,
}

/// Handler for attaching products to plans.
pub struct AttachProductHandler {
    plans: Arc<dyn PlanStore>,
    products: Arc<dyn ProductPriceStore>,
}

impl AttachProductHandler {
    pub fn new(plans: Arc<dyn PlanStore>, products: Arc<dyn ProductPriceStore>) -> Self {
        Self { plans, products }
    }

    pub async fn handle(&self, cmd: AttachProductCommand) -> Result<AttachProductResult, PlanError> {
        let plan = self
            .plans
            .find_by_id(cmd.plan_id)
            .await?
            .ok_or_else(|| PlanError::not_found(cmd.plan_id))?;

        if plan.status == PlanStatus::Expired {
            return Err(PlanError::invalid_state("Expired", "attach product to"));
        }

        let price = self
            .products
            .price_of(cmd.product_id)
            .await?
            .ok_or_else(|| PlanError::product_not_found(cmd.product_id))?;

        self.plans.attach_product(plan.id, cmd.product_id).await?;

        // An Active plan claims the product immediately, overwriting any
        // discount a different plan owned.
        let applied_price = if plan.status == PlanStatus::Active {
            let discounted = plan.discount.price_after(price);
            self.products
                .set_discount(cmd.product_id, discounted, plan.id)
                .await?;
            tracing::info!(
                plan_id = %plan.id,
                product_id = %cmd.product_id,
                discounted_price = discounted,
                "applied discount on attach"
            );
            Some(discounted)
        } else {
            None
        };

        Ok(AttachProductResult { applied_price })
    }
}
