//! In-memory TTL caching for the StatsGames gateway
//!
//! This crate provides the cache store used to absorb repeated player lookups
//! before they reach the upstream game-statistics API.
//!
//! # Features
//!
//! - **Absolute TTL**: every entry expires a fixed duration after it was written,
//!   regardless of how often it is read
//! - **Expiry-Checked Reads**: [`TtlCache::get`] never returns a stale entry, even
//!   when the background sweep has not run yet
//! - **Background Sweeping**: [`TtlCache::spawn_sweeper`] reclaims memory held by
//!   expired entries on a fixed interval
//! - **Injectable Clock**: [`ManualClock`] lets tests move time forward without sleeping
//! - **Concurrent**: sharded storage via `dashmap`, safe to share across request tasks
//!
//! # Example
//!
//! ```rust
//! use statsgames_cache::{CacheConfig, ManualClock, TtlCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), statsgames_cache::CacheError> {
//! let clock = Arc::new(ManualClock::new());
//! let config = CacheConfig::new().with_ttl(Duration::from_secs(300));
//! let cache: TtlCache<String, String> = TtlCache::with_clock(config, clock.clone())?;
//!
//! cache.set("coc_player_#ABC".to_string(), "payload".to_string());
//! assert_eq!(cache.get(&"coc_player_#ABC".to_string()), Some("payload".to_string()));
//!
//! clock.advance(Duration::from_secs(300));
//! assert_eq!(cache.get(&"coc_player_#ABC".to_string()), None);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod clock;
pub mod config;
pub mod error;
pub mod stats;
pub mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use stats::CacheStats;
pub use ttl_cache::{SweeperHandle, TtlCache};
