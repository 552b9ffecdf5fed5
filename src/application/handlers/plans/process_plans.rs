//! ProcessPlansHandler - the scheduler tick.
//!
//! One invocation scans every discount plan, activates those whose window
//! has opened, expires those whose window has closed, and keeps each
//! member product's discounted price consistent with its owning plan.
//! Idempotent and re-entrant: a tick cut short by a crash is repaired by
//! the next one, because due-plan queries are driven purely by persisted
//! status and the clock.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::plans::{DiscountPlan, PlanError, ProductDiscount};
use crate::ports::{Clock, PlanStore, ProductPriceStore};

/// Counts of what one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Plans flipped Scheduled -> Active.
    pub activated: usize,

    /// Plans flipped Active -> Expired.
    pub expired: usize,

    /// Plans whose transition failed and was left for the next tick.
    pub failed: usize,
}

/// Handler for the periodic `process_plans` operation.
///
/// Failures are best-effort per plan: one plan's failure is logged and
/// skipped, never aborting the rest of the tick. Only a failure to list
/// due plans at all aborts the run.
pub struct ProcessPlansHandler {
    plans: Arc<dyn PlanStore>,
    products: Arc<dyn ProductPriceStore>,
    clock: Arc<dyn Clock>,
}

impl ProcessPlansHandler {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        products: Arc<dyn ProductPriceStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            plans,
            products,
            clock,
        }
    }

    /// Runs one tick: the activation pass, then the expiry pass.
    ///
    /// # Errors
    ///
    /// Returns an error only when the plan store cannot even list due
    /// plans; per-plan failures are counted in the summary instead.
    pub async fn handle(&self) -> Result<TickSummary, PlanError> {
        let now = self.clock.now();
        let mut summary = TickSummary::default();

        // Both due lists are snapshotted up front: the expiry pass must
        // only see plans that were already Active when the tick started,
        // so a plan activated by pass 1 cannot expire in the same tick
        // even when its whole window has already passed.
        let due_activation = self.plans.due_for_activation(now).await?;
        let due_expiry = self.plans.due_for_expiry(now).await?;

        // Pass 1: activate. Plans are ordered by ascending (start_date, id),
        // so the latest-starting plan is processed last and wins any
        // contested product.
        for plan in due_activation {
            match self.activate_plan(&plan, now).await {
                Ok(count) => {
                    tracing::info!(
                        plan_id = %plan.id,
                        store_id = %plan.store_id,
                        products = count,
                        "activated discount plan"
                    );
                    summary.activated += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        plan_id = %plan.id,
                        error = %e,
                        "failed to activate plan; next tick will retry"
                    );
                    summary.failed += 1;
                }
            }
        }

        // Pass 2: expire, from the snapshot taken before pass 1 ran.
        for plan in due_expiry {
            match self.expire_plan(&plan, now).await {
                Ok(count) => {
                    tracing::info!(
                        plan_id = %plan.id,
                        store_id = %plan.store_id,
                        products = count,
                        "expired discount plan"
                    );
                    summary.expired += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        plan_id = %plan.id,
                        error = %e,
                        "failed to expire plan; next tick will retry"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Computes every member's discounted price, then commits the status
    /// flip and all product writes as one atomic unit.
    async fn activate_plan(&self, plan: &DiscountPlan, now: Timestamp) -> Result<usize, PlanError> {
        let members = self.plans.member_product_ids(plan.id).await?;

        let mut discounts = Vec::with_capacity(members.len());
        for product_id in members {
            match self.products.price_of(product_id).await? {
                Some(price) => discounts.push(ProductDiscount {
                    product_id,
                    discounted_price: plan.discount.price_after(price),
                }),
                None => {
                    // A vanished product must not abort the whole plan.
                    tracing::warn!(
                        plan_id = %plan.id,
                        product_id = %product_id,
                        "member product missing; skipping"
                    );
                }
            }
        }

        self.plans.commit_activation(plan.id, &discounts, now).await?;
        Ok(discounts.len())
    }

    /// Commits the status flip and the ownership-checked clears as one
    /// atomic unit. Products owned by another plan are left untouched by
    /// the store.
    async fn expire_plan(&self, plan: &DiscountPlan, now: Timestamp) -> Result<usize, PlanError> {
        let members = self.plans.member_product_ids(plan.id).await?;
        let count = members.len();
        self.plans.commit_expiry(plan.id, &members, now).await?;
        Ok(count)
    }
}
