//! Adapters - concrete implementations of the ports.

mod clock;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use clock::{FixedClock, SystemClock};
pub use memory::InMemoryDiscountStore;
pub use postgres::PostgresDiscountStore;
pub use scheduler::{PlanSchedulerConfig, PlanSchedulerService};
