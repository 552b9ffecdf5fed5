//! Application layer - use-case orchestration over ports.

pub mod handlers;
