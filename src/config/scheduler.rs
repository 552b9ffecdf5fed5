//! Scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between scheduler ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

impl SchedulerConfig {
    /// Get tick interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tick_interval_secs < 1 {
            return Err(ValidationError::TickIntervalTooShort);
        }
        if self.tick_interval_secs > 3600 {
            return Err(ValidationError::TickIntervalTooLong);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
        }
    }
}

fn default_tick_interval() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_minute() {
        let config = SchedulerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_zero_interval() {
        let config = SchedulerConfig {
            tick_interval_secs: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_interval_over_an_hour() {
        let config = SchedulerConfig {
            tick_interval_secs: 7200,
        };
        assert!(config.validate().is_err());
    }
}
