//! Control loop configuration.

use crate::queue::{BoundedQueue, QueueError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating a `LoopConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse loop configuration: {0}")]
    Parse(String),

    #[error("Tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("Tick base must be greater than zero")]
    ZeroTickBase,

    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// What the control loop does after a dispatch reports an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Log the failure and keep dispatching
    #[default]
    LogAndContinue,

    /// Log the failure, then re-run the machine's initialization
    Reset,
}

/// Settings for a `ControlLoop`.
///
/// Durations are written in milliseconds in JSON:
///
/// ```rust
/// use fsmloop::runtime::{LoopConfig, RecoveryPolicy};
/// use std::time::Duration;
///
/// let config = LoopConfig::from_json(r#"{ "tick_interval_ms": 50, "recovery": "reset" }"#).unwrap();
/// assert_eq!(config.tick_interval, Duration::from_millis(50));
/// assert_eq!(config.tick_base, 10);
/// assert_eq!(config.recovery, RecoveryPolicy::Reset);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Wait before a tick is synthesized when no input arrives
    #[serde(rename = "tick_interval_ms", with = "millis")]
    pub tick_interval: Duration,

    /// Tick sub-counter wraps to 0 after reaching this value
    pub tick_base: u8,

    /// Capacity of queues created with `LoopConfig::queue`. A loop built
    /// around a queue made elsewhere keeps that queue's own capacity.
    pub queue_capacity: usize,

    pub recovery: RecoveryPolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            tick_base: 10,
            queue_capacity: 10,
            recovery: RecoveryPolicy::LogAndContinue,
        }
    }
}

impl LoopConfig {
    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.tick_base == 0 {
            return Err(ConfigError::ZeroTickBase);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }

    /// Create an empty queue with the configured capacity.
    pub fn queue<T>(&self) -> Result<BoundedQueue<T>, QueueError> {
        BoundedQueue::new(self.queue_capacity)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timing() {
        let config = LoopConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.tick_base, 10);
        assert_eq!(config.queue_capacity, 10);
        assert_eq!(config.recovery, RecoveryPolicy::LogAndContinue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = LoopConfig::from_json("{}").unwrap();
        assert_eq!(config, LoopConfig::default());
    }

    #[test]
    fn json_roundtrip_uses_milliseconds() {
        let config = LoopConfig {
            tick_interval: Duration::from_millis(250),
            ..LoopConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""tick_interval_ms":250"#));
        assert_eq!(LoopConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            LoopConfig::from_json(r#"{ "tick_interval_ms": 0 }"#),
            Err(ConfigError::ZeroTickInterval)
        );
        assert_eq!(
            LoopConfig::from_json(r#"{ "tick_base": 0 }"#),
            Err(ConfigError::ZeroTickBase)
        );
        assert_eq!(
            LoopConfig::from_json(r#"{ "queue_capacity": 0 }"#),
            Err(ConfigError::ZeroQueueCapacity)
        );
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = LoopConfig::from_json("{ tick_base: }");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn queue_uses_configured_capacity() {
        let config = LoopConfig {
            queue_capacity: 3,
            ..LoopConfig::default()
        };
        let queue = config.queue::<char>().unwrap();
        assert_eq!(queue.capacity(), 3);
    }
}
