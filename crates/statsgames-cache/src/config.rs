//! Cache configuration

use crate::error::{CacheError, CacheResult};
use std::time::Duration;

/// Default time-to-live for cached entries (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default interval between expiry sweeps (1 minute)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// TTL cache configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays valid after it is written
    pub ttl: Duration,
    /// How often the background sweeper scans for expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry time-to-live
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep interval
    #[must_use]
    pub const fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> CacheResult<()> {
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfiguration(
                "ttl must be greater than 0".to_string(),
            ));
        }

        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfiguration(
                "sweep_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
