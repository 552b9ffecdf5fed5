//! DiscountPlan aggregate entity.
//!
//! A discount plan is a store-scoped campaign: a discount, a time window,
//! and a set of member products eligible for the discount while the plan
//! is Active. Membership is independent of status; it means "eligible
//! when Active", not "currently discounted".
//!
//! # Design Decisions
//!
//! - **Prices in minor units**: all monetary values are i64 minor currency
//!   units (never floats)
//! - **Always created Scheduled**: even when the window already contains
//!   now; the next scheduler tick activates it, keeping one activation path
//! - **Clock-driven**: every mutation takes the current time as an argument
//!   so the whole lifecycle is deterministic under a test clock

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, StateMachine, StoreId, Timestamp, UserId};

use super::{Discount, PlanError, PlanStatus};

/// DiscountPlan aggregate.
///
/// # Invariants
///
/// - `end_date > start_date` strictly, enforced at creation
/// - `status` only moves forward: Scheduled -> Active -> Expired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPlan {
    /// Unique identifier for this plan.
    pub id: PlanId,

    /// Store that owns this plan.
    pub store_id: StoreId,

    /// Display name of the campaign.
    pub name: String,

    /// The validated discount applied to member products.
    pub discount: Discount,

    /// When the plan starts (inclusive).
    pub start_date: Timestamp,

    /// When the plan ends (inclusive; expiry triggers once now is past it).
    pub end_date: Timestamp,

    /// Current lifecycle status.
    pub status: PlanStatus,

    /// Administrator who created the plan.
    pub created_by: UserId,

    /// When the plan was created.
    pub created_at: Timestamp,

    /// When the plan was last updated.
    pub updated_at: Timestamp,
}

impl DiscountPlan {
    /// Creates a new plan in Scheduled status.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is empty
    /// - `InvalidWindow` unless `end_date > start_date`
    pub fn create(
        id: PlanId,
        store_id: StoreId,
        name: impl Into<String>,
        discount: Discount,
        start_date: Timestamp,
        end_date: Timestamp,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, PlanError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlanError::validation("name", "cannot be empty"));
        }
        if !end_date.is_after(&start_date) {
            return Err(PlanError::invalid_window(
                "end_date must be strictly after start_date",
            ));
        }

        Ok(Self {
            id,
            store_id,
            name,
            discount,
            start_date,
            end_date,
            status: PlanStatus::Scheduled,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if this Scheduled plan's window has opened.
    pub fn due_for_activation(&self, now: Timestamp) -> bool {
        self.status == PlanStatus::Scheduled && !self.start_date.is_after(&now)
    }

    /// Returns true if this Active plan's window has closed.
    pub fn due_for_expiry(&self, now: Timestamp) -> bool {
        self.status == PlanStatus::Active && self.end_date.is_before(&now)
    }

    /// Transitions the plan to Active.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the plan is Scheduled.
    pub fn activate(&mut self, now: Timestamp) -> Result<(), PlanError> {
        self.transition_to(PlanStatus::Active, "activate")?;
        self.updated_at = now;
        Ok(())
    }

    /// Transitions the plan to Expired.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the plan is Active.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), PlanError> {
        self.transition_to(PlanStatus::Expired, "expire")?;
        self.updated_at = now;
        Ok(())
    }

    fn transition_to(&mut self, target: PlanStatus, attempted: &str) -> Result<(), PlanError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| PlanError::invalid_state(format!("{:?}", self.status), attempted))?;
        Ok(())
    }
}
