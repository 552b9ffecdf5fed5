//! Plan command handlers.
//!
//! One handler per operation:
//!
//! - `ProcessPlansHandler` - the periodic scheduler tick
//! - `CreatePlanHandler` - plan creation with validation
//! - `DeletePlanHandler` - two-step delete (clear owned discounts, then delete)
//! - `AttachProductHandler` / `DetachProductHandler` - membership mutation
//!   with immediate discount application/removal on Active plans

mod attach_product;
mod create_plan;
mod delete_plan;
mod detach_product;
mod process_plans;

pub use attach_product::{AttachProductCommand, AttachProductHandler, AttachProductResult};
pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use delete_plan::{DeletePlanCommand, DeletePlanHandler, DeletePlanResult};
pub use detach_product::{DetachProductCommand, DetachProductHandler, DetachProductResult};
pub use process_plans::{ProcessPlansHandler, TickSummary};
