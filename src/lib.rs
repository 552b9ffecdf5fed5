//! Discount Scheduler - lifecycle engine for time-windowed discount plans
//!
//! This crate moves discount plans through their Scheduled -> Active ->
//! Expired lifecycle on a periodic tick, applying and removing per-product
//! discounted prices atomically per plan.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
