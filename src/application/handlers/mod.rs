//! Command handlers, grouped by domain area.

pub mod plans;
