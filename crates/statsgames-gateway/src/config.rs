//! Gateway configuration.
//!
//! Configuration comes from, in order of precedence:
//! - CLI arguments (`--bind`, `--cache-ttl-secs`, etc.)
//! - Environment variables (`STATSGAMES_BIND`, `SUPERCELL_API_KEY`, etc.),
//!   including values loaded from a `.env` file by the binary
//! - Default values
//!
//! # Example
//!
//! ```no_run
//! use statsgames_gateway::GatewayConfig;
//!
//! let config = GatewayConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway will bind to: {}", config.bind);
//! ```

use crate::diag::DEFAULT_IP_LOOKUP_URL;
use crate::error::ConfigError;
use crate::kind::{ResourceKind, UpstreamEndpoints};
use crate::upstream::UpstreamConfig;
use clap::Parser;
use statsgames_cache::CacheConfig;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Gateway configuration loaded from CLI args and environment variables.
#[derive(Clone, Parser)]
#[command(
    name = "statsgames-gateway",
    about = "Caching gateway for the Clash of Clans and Clash Royale player APIs",
    version
)]
pub struct GatewayConfig {
    /// HTTP bind address
    #[arg(long, env = "STATSGAMES_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Supercell developer API key sent as bearer token
    #[arg(long, env = "SUPERCELL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Clash of Clans API base URL
    #[arg(
        long,
        env = "STATSGAMES_COC_URL",
        default_value = "https://api.clashofclans.com/v1"
    )]
    pub clash_of_clans_url: String,

    /// Clash Royale API base URL
    #[arg(
        long,
        env = "STATSGAMES_CR_URL",
        default_value = "https://api.clashroyale.com/v1"
    )]
    pub clash_royale_url: String,

    /// IP echo service used by /diag/ip
    #[arg(long, env = "STATSGAMES_IP_LOOKUP_URL", default_value = DEFAULT_IP_LOOKUP_URL)]
    pub ip_lookup_url: String,

    /// Seconds a cached player payload stays valid
    #[arg(long, env = "STATSGAMES_CACHE_TTL", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Seconds between expired-entry sweeps
    #[arg(long, env = "STATSGAMES_SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "STATSGAMES_UPSTREAM_TIMEOUT", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    /// Upstream connect timeout in seconds
    #[arg(long, env = "STATSGAMES_CONNECT_TIMEOUT", default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_key: None,
            clash_of_clans_url: ResourceKind::ClashOfClans.default_base_url().to_string(),
            clash_royale_url: ResourceKind::ClashRoyale.default_base_url().to_string(),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            cache_ttl_secs: 300,
            sweep_interval_secs: 60,
            upstream_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("bind", &self.bind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("clash_of_clans_url", &self.clash_of_clans_url)
            .field("clash_royale_url", &self.clash_royale_url)
            .field("ip_lookup_url", &self.ip_lookup_url)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl GatewayConfig {
    /// Parse configuration from command-line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Any URL option does not parse
    /// - Any duration option is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints()?;
        self.ip_lookup_url()?;

        for (field, value) in [
            ("cache_ttl_secs", self.cache_ttl_secs),
            ("sweep_interval_secs", self.sweep_interval_secs),
            ("upstream_timeout_secs", self.upstream_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration(field));
            }
        }

        Ok(())
    }

    /// Upstream base URLs.
    pub fn endpoints(&self) -> Result<UpstreamEndpoints, ConfigError> {
        Ok(UpstreamEndpoints::new(
            parse_url("clash_of_clans_url", &self.clash_of_clans_url)?,
            parse_url("clash_royale_url", &self.clash_royale_url)?,
        ))
    }

    /// IP echo service URL.
    pub fn ip_lookup_url(&self) -> Result<Url, ConfigError> {
        parse_url("ip_lookup_url", &self.ip_lookup_url)
    }

    /// Cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
    }

    /// Upstream HTTP client settings.
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            request_timeout: Duration::from_secs(self.upstream_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..UpstreamConfig::default()
        }
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_defaults() {
        let config = GatewayConfig::parse_from(["statsgames-gateway"]);

        assert_eq!(config.bind, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.clash_of_clans_url, "https://api.clashofclans.com/v1");
        assert_eq!(config.clash_royale_url, "https://api.clashroyale.com/v1");
        assert_eq!(config.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.upstream_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_default_matches_parsed_defaults() {
        let mut parsed = GatewayConfig::parse_from(["statsgames-gateway"]);
        // The environment may carry a key; only the defaults are compared
        parsed.api_key = None;
        assert_eq!(format!("{parsed:?}"), format!("{:?}", GatewayConfig::default()));
    }

    #[test]
    fn test_parse_overrides() {
        let config = GatewayConfig::parse_from([
            "statsgames-gateway",
            "--bind",
            "127.0.0.1:8080",
            "--api-key",
            "abc",
            "--cache-ttl-secs",
            "5",
            "--clash-royale-url",
            "http://localhost:9000/v1",
        ]);

        assert_eq!(config.bind.port(), 8080);
        assert!(config.has_api_key());
        assert_eq!(config.cache_config().ttl, Duration::from_secs(5));
        assert_eq!(
            config
                .endpoints()
                .unwrap()
                .base_url(ResourceKind::ClashRoyale)
                .as_str(),
            "http://localhost:9000/v1"
        );
    }

    #[test]
    fn test_validate_default() {
        assert!(GatewayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = GatewayConfig {
            clash_of_clans_url: "not a url".to_string(),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "clash_of_clans_url",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let config = GatewayConfig {
            sweep_interval_secs: 0,
            ..GatewayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration("sweep_interval_secs"))
        ));
    }

    #[test]
    fn test_upstream_config_uses_timeouts() {
        let config = GatewayConfig {
            upstream_timeout_secs: 7,
            connect_timeout_secs: 2,
            ..GatewayConfig::default()
        };
        let upstream = config.upstream_config();
        assert_eq!(upstream.request_timeout, Duration::from_secs(7));
        assert_eq!(upstream.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GatewayConfig {
            api_key: Some("super-secret".to_string()),
            ..GatewayConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = GatewayConfig {
            api_key: Some("   ".to_string()),
            ..GatewayConfig::default()
        };
        assert!(!config.has_api_key());
    }
}
