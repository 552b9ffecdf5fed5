//! Clock port - injectable time source.
//!
//! The entire subsystem is time-driven, so wall-clock reads go through
//! this port. Production uses the system clock; tests use a settable
//! clock to make lifecycle transitions deterministic.

use crate::domain::foundation::Timestamp;

/// Supplies the current time.
pub trait Clock: Send + Sync {
    /// Returns the current moment.
    fn now(&self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_object_safe() {
        fn _accepts_dyn(_clock: &dyn Clock) {}
    }
}
