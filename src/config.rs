//! Scheduler configuration.
//!
//! This struct is created once at the application boundary (the service
//! layer's environment or config file) and passed down to `mkschedule` calls.
//! The core itself has exactly one knob: the task size bounding how many
//! fragment ids a single task blob may carry.

use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// Configuration for schedule compilation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// The maximum number of fragment ids per task blob. Smaller tasks spread
    /// better over workers; larger tasks amortize per-message overhead.
    #[serde(default = "default_task_size")]
    pub task_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_size: default_task_size(),
        }
    }
}

impl SchedulerConfig {
    /// Rejects configurations the partitioner would refuse anyway, so the
    /// misconfiguration surfaces at startup rather than per request.
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.task_size < 1 {
            return Err(StrataError::Config(format!(
                "task_size (= {}) < 1",
                self.task_size
            )));
        }
        Ok(())
    }
}

/// Helper for `serde` to provide a default for `task_size`.
fn default_task_size() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert_eq!(config.task_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_task_size_defaults_when_absent() {
        let config: SchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_zero_task_size_fails_validation() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"task_size": 0}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(StrataError::Config(_))
        ));
    }
}
