//! Error types for the notification store
//!
//! The store has a deliberately small failure surface:
//! - Calls made after teardown
//! - Invalid configuration at creation time
//! - Creating a store with a generator outside a Tokio runtime
//!
//! Marking an unknown id as read is not an error.

/// Main store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store has been torn down
    #[error("notification store is inactive (torn down)")]
    Inactive,

    /// Configuration rejected at creation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generator needs a Tokio runtime to run on
    #[error("no Tokio runtime available for the notification generator")]
    NoRuntime,
}

impl StoreError {
    /// Check if error comes from using a torn-down store
    #[inline]
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Generator interval must be positive
    #[error("generator interval must be greater than zero")]
    ZeroInterval,

    /// Generator interval past the supported maximum
    #[error("generator interval of {secs}s exceeds the maximum of {max}s")]
    IntervalTooLarge { secs: u64, max: u64 },

    /// Event channel needs room for at least one event
    #[error("event capacity must be greater than zero")]
    ZeroEventCapacity,

    /// TOML could not be parsed
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
