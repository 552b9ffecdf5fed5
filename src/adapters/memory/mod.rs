//! In-memory adapters for tests and local development.

mod discount_store;

pub use discount_store::InMemoryDiscountStore;
