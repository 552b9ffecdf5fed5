//! Background scheduler service.

mod runner;

pub use runner::{PlanSchedulerConfig, PlanSchedulerService};
