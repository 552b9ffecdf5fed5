//! Discount plan domain module.
//!
//! Covers the plan lifecycle (Scheduled -> Active -> Expired), discount
//! math, and the product pricing view mutated by the scheduler.
//!
//! # Module Structure
//!
//! - `plan` - DiscountPlan aggregate entity
//! - `status` - PlanStatus state machine
//! - `discount` - Discount value object and price math
//! - `pricing` - ProductPricing view and ProductDiscount write record
//! - `errors` - PlanError

mod discount;
mod errors;
mod plan;
mod pricing;
mod status;

pub use discount::{Discount, DiscountType};
pub use errors::PlanError;
pub use plan::DiscountPlan;
pub use pricing::{ProductDiscount, ProductPricing};
pub use status::PlanStatus;
