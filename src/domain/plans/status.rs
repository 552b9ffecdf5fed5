//! Plan status state machine.
//!
//! A discount plan moves forward-only through its lifecycle:
//! Scheduled -> Active -> Expired. The scheduler keeps this status
//! eventually consistent with the plan's time window.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a discount plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Created but not yet started. Member products carry no discount
    /// from this plan.
    Scheduled,

    /// The plan's window contains now; member discounts are applied.
    Active,

    /// The window has passed. Terminal; an expired plan never reactivates.
    Expired,
}

impl PlanStatus {
    /// Returns true if products owned by a plan in this status should
    /// carry its discount.
    pub fn discounts_apply(&self) -> bool {
        matches!(self, PlanStatus::Active)
    }
}

impl StateMachine for PlanStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PlanStatus::*;
        matches!((self, target), (Scheduled, Active) | (Active, Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PlanStatus::*;
        match self {
            Scheduled => vec![Active],
            Active => vec![Expired],
            Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_can_activate() {
        let status = PlanStatus::Scheduled;
        assert!(status.can_transition_to(&PlanStatus::Active));
        assert_eq!(status.transition_to(PlanStatus::Active), Ok(PlanStatus::Active));
    }

    #[test]
    fn active_can_expire() {
        let status = PlanStatus::Active;
        assert!(status.can_transition_to(&PlanStatus::Expired));
        assert_eq!(status.transition_to(PlanStatus::Expired), Ok(PlanStatus::Expired));
    }

    #[test]
    fn scheduled_cannot_skip_to_expired() {
        let status = PlanStatus::Scheduled;
        assert!(!status.can_transition_to(&PlanStatus::Expired));
        assert!(status.transition_to(PlanStatus::Expired).is_err());
    }

    #[test]
    fn transitions_are_forward_only() {
        assert!(!PlanStatus::Active.can_transition_to(&PlanStatus::Scheduled));
        assert!(!PlanStatus::Expired.can_transition_to(&PlanStatus::Active));
        assert!(!PlanStatus::Expired.can_transition_to(&PlanStatus::Scheduled));
    }

    #[test]
    fn expired_is_terminal() {
        assert!(PlanStatus::Expired.is_terminal());
        assert!(!PlanStatus::Scheduled.is_terminal());
        assert!(!PlanStatus::Active.is_terminal());
    }

    #[test]
    fn discounts_apply_only_when_active() {
        assert!(PlanStatus::Active.discounts_apply());
        assert!(!PlanStatus::Scheduled.discounts_apply());
        assert!(!PlanStatus::Expired.discounts_apply());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PlanStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
    }
}
