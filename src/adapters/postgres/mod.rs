//! PostgreSQL adapters.

mod discount_store;

pub use discount_store::PostgresDiscountStore;
