//! Store configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default generator period: five minutes of wall time
pub const DEFAULT_GENERATOR_INTERVAL_SECS: u64 = 300;

/// Longest accepted generator period: thirty days
pub const MAX_GENERATOR_INTERVAL_SECS: u64 = 30 * 24 * 60 * 60;

/// Default broadcast buffer for store events
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Notification store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Whether the background generator runs
    pub generator_enabled: bool,
    /// Seconds between generated notifications
    pub generator_interval_secs: u64,
    /// Fixed RNG seed for reproducible generated content
    pub generator_seed: Option<u64>,
    /// Broadcast buffer for subscribers
    pub event_capacity: usize,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML and validate
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - any error from [`StoreConfig::validate`]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// With generator enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_generator(mut self, enabled: bool) -> Self {
        self.generator_enabled = enabled;
        self
    }

    /// With generator interval
    ///
    /// Sub-second intervals round up to one second; use
    /// [`StoreConfig::generator_interval`] to read the effective value.
    #[inline]
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        let secs = interval
            .as_secs()
            .saturating_add(u64::from(interval.subsec_nanos() > 0));
        self.generator_interval_secs = secs;
        self
    }

    /// With fixed generator seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator_seed = Some(seed);
        self
    }

    /// With event capacity
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Generator period
    #[inline]
    #[must_use]
    pub fn generator_interval(&self) -> Duration {
        Duration::from_secs(self.generator_interval_secs)
    }

    /// Check invariants
    ///
    /// # Errors
    /// - `ConfigError::ZeroInterval` if the interval is zero
    /// - `ConfigError::IntervalTooLarge` past [`MAX_GENERATOR_INTERVAL_SECS`]
    /// - `ConfigError::ZeroEventCapacity` if the event buffer is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.generator_interval_secs > MAX_GENERATOR_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooLarge {
                secs: self.generator_interval_secs,
                max: MAX_GENERATOR_INTERVAL_SECS,
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            generator_enabled: true,
            generator_interval_secs: DEFAULT_GENERATOR_INTERVAL_SECS,
            generator_seed: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_five_minute_feed() {
        let config = StoreConfig::new();
        assert!(config.generator_enabled);
        assert_eq!(config.generator_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let config = StoreConfig::new()
            .with_generator(false)
            .with_interval(Duration::from_millis(1500))
            .with_seed(7)
            .with_event_capacity(8);

        assert!(!config.generator_enabled);
        assert_eq!(config.generator_interval_secs, 2);
        assert_eq!(config.generator_seed, Some(7));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn parse_partial_toml() {
        let config =
            StoreConfig::from_toml_str("generator_interval_secs = 60\ngenerator_seed = 42\n")
                .unwrap();
        assert_eq!(config.generator_interval_secs, 60);
        assert_eq!(config.generator_seed, Some(42));
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn rejects_zero_values() {
        assert!(matches!(
            StoreConfig::from_toml_str("generator_interval_secs = 0"),
            Err(ConfigError::ZeroInterval)
        ));
        assert!(matches!(
            StoreConfig::new().with_event_capacity(0).validate(),
            Err(ConfigError::ZeroEventCapacity)
        ));
        assert!(matches!(
            StoreConfig::from_toml_str("generator_enabled = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_oversized_interval() {
        assert!(matches!(
            StoreConfig::from_toml_str("generator_interval_secs = 9223372036854775807"),
            Err(ConfigError::IntervalTooLarge { max: MAX_GENERATOR_INTERVAL_SECS, .. })
        ));

        let at_limit =
            StoreConfig::new().with_interval(Duration::from_secs(MAX_GENERATOR_INTERVAL_SECS));
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn max_duration_saturates() {
        let config = StoreConfig::new().with_interval(Duration::MAX);
        assert_eq!(config.generator_interval_secs, u64::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalTooLarge { secs: u64::MAX, .. })
        ));
    }
}
