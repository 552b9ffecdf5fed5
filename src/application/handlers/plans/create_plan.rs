//! CreatePlanHandler - Command handler for creating discount plans.

use std::sync::Arc;

use crate::domain::foundation::{PlanId, StoreId, Timestamp, UserId};
use crate::domain::plans::{Discount, DiscountPlan, DiscountType, PlanError};
use crate::ports::{Clock, PlanStore};

/// Command to create a new discount plan.
#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub store_id: StoreId,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_by: UserId,
}

/// Handler for creating discount plans.
///
/// Plans are always created Scheduled; a plan whose window already
/// contains now is picked up by the next scheduler tick.
pub struct CreatePlanHandler {
    plans: Arc<dyn PlanStore>,
    clock: Arc<dyn Clock>,
}

impl CreatePlanHandler {
    pub fn new(plans: Arc<dyn PlanStore>, clock: Arc<dyn Clock>) -> Self {
        Self { plans, clock }
    }

    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<DiscountPlan, PlanError> {
        let discount = Discount::new(cmd.discount_type, cmd.discount_value)?;

        let plan = DiscountPlan::create(
            PlanId::new(),
            cmd.store_id,
            cmd.name,
            discount,
            cmd.start_date,
            cmd.end_date,
            cmd.created_by,
            self.clock.now(),
        )?;

        self.plans.insert(&plan).await?;

        tracing::info!(plan_id = %plan.id, store_id = %plan.store_id, "created discount plan");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryDiscountStore};
    use crate::domain::plans::PlanStatus;

    fn base_time() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn valid_command(now: Timestamp) -> CreatePlanCommand {
        CreatePlanCommand {
            store_id: StoreId::new(),
            name: "Clearance".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 40,
            start_date: now.plus_days(1),
            end_date: now.plus_days(8),
            created_by: UserId::new(),
        }
    }

    #[tokio::test]
    async fn creates_scheduled_plan() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store.clone(), Arc::new(FixedClock::at(now)));

        let plan = handler.handle(valid_command(now)).await.unwrap();

        assert_eq!(plan.status, PlanStatus::Scheduled);
        assert_eq!(plan.created_at, now);
        assert_eq!(store.plan(plan.id), Some(plan));
    }

    #[tokio::test]
    async fn plan_with_open_window_is_still_created_scheduled() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store, Arc::new(FixedClock::at(now)));

        let mut cmd = valid_command(now);
        cmd.start_date = now.minus_days(1);

        let plan = handler.handle(cmd).await.unwrap();
        assert_eq!(plan.status, PlanStatus::Scheduled);
        assert!(plan.due_for_activation(now));
    }

    #[tokio::test]
    async fn rejects_percentage_out_of_range() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store.clone(), Arc::new(FixedClock::at(now)));

        let mut cmd = valid_command(now);
        cmd.discount_value = 150;

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(PlanError::InvalidDiscount { .. })));
    }

    #[tokio::test]
    async fn rejects_zero_fixed_discount() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store, Arc::new(FixedClock::at(now)));

        let mut cmd = valid_command(now);
        cmd.discount_type = DiscountType::Fixed;
        cmd.discount_value = 0;

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(PlanError::InvalidDiscount { .. })));
    }

    #[tokio::test]
    async fn rejects_inverted_window() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store, Arc::new(FixedClock::at(now)));

        let mut cmd = valid_command(now);
        cmd.start_date = now.plus_days(8);
        cmd.end_date = now.plus_days(1);

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(PlanError::InvalidWindow { .. })));
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let now = base_time();
        let store = Arc::new(InMemoryDiscountStore::new());
        let handler = CreatePlanHandler::new(store, Arc::new(FixedClock::at(now)));

        let mut cmd = valid_command(now);
        cmd.name = "  ".to_string();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(PlanError::ValidationFailed { .. })));
    }
}
