//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PlanStore` - discount plan persistence and atomic per-plan commits
//! - `ProductPriceStore` - product price reads and discount-column writes
//! - `Clock` - injectable time source

mod clock;
mod plan_store;
mod product_price_store;

pub use clock::Clock;
pub use plan_store::PlanStore;
pub use product_price_store::ProductPriceStore;
