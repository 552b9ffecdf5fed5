//! DeletePlanHandler - Command handler for deleting discount plans.
//!
//! Deletion is an explicit two-step operation: first clear every member
//! discount this plan owns, then delete the plan and its membership rows.
//! The ownership check means a shared product claimed by another plan
//! keeps its discount.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::plans::PlanError;
use crate::ports::{PlanStore, ProductPriceStore};

/// Command to delete a discount plan.
#[derive(Debug, Clone)]
pub struct DeletePlanCommand {
    pub plan_id: PlanId,
}

/// Result of a successful plan deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletePlanResult {
    /// How many member products had their discount cleared.
    pub discounts_cleared: usize,
}

/// Handler for deleting discount plans.
pub struct DeletePlanHandler {
    plans: Arc<dyn PlanStore>,
    products: Arc<dyn ProductPriceStore>,
}

impl DeletePlanHandler {
    pub fn new(plans: Arc<dyn PlanStore>, products: Arc<dyn ProductPriceStore>) -> Self {
        Self { plans, products }
    }

    pub async fn handle(&self, cmd: DeletePlanCommand) -> Result<DeletePlanResult, PlanError> {
        let plan = self
            .plans
            .find_by_id(cmd.plan_id)
            .await?
            .ok_or_else(|| PlanError::not_found(cmd.plan_id))?;

        // Step 1: remove every discount this plan owns.
        let members = self.plans.member_product_ids(plan.id).await?;
        let mut discounts_cleared = 0;
        for product_id in members {
            if self
                .products
                .clear_discount_if_owned_by(product_id, plan.id)
                .await?
            {
                discounts_cleared += 1;
            }
        }

        // Step 2: delete the plan and its membership rows.
        self.plans.delete(plan.id).await?;

        tracing::info!(
            plan_id = %plan.id,
            discounts_cleared,
            "deleted discount plan"
        );
        Ok(DeletePlanResult { discounts_cleared })
    }
}
