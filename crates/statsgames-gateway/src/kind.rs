//! Resource kinds, player tags and cache keys.
//!
//! Every upstream game-data service is a [`ResourceKind`]. A kind fixes the
//! route it is served on, its default upstream base URL and the namespace
//! prefix of its cache keys, so the same tag looked up against two services
//! never shares a cache entry.

use crate::error::GatewayError;
use std::fmt;
use url::Url;

/// Upstream game-data service targeted by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Clash of Clans player API
    ClashOfClans,
    /// Clash Royale player API
    ClashRoyale,
}

impl ResourceKind {
    /// All supported kinds, in route registration order.
    pub const ALL: [Self; 2] = [Self::ClashOfClans, Self::ClashRoyale];

    /// HTTP route serving player lookups for this kind.
    pub const fn route(self) -> &'static str {
        match self {
            Self::ClashOfClans => "/player",
            Self::ClashRoyale => "/clashroyale/player",
        }
    }

    /// Namespace prefix for cache keys of this kind.
    pub const fn cache_prefix(self) -> &'static str {
        match self {
            Self::ClashOfClans => "coc_player_",
            Self::ClashRoyale => "cr_player_",
        }
    }

    /// Production upstream base URL.
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::ClashOfClans => "https://api.clashofclans.com/v1",
            Self::ClashRoyale => "https://api.clashroyale.com/v1",
        }
    }

    /// Error message returned when the upstream call fails.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::ClashOfClans => "Failed to fetch player data from Supercell.",
            Self::ClashRoyale => "Failed to fetch Clash Royale player data.",
        }
    }

    /// Human readable service name used in logs.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ClashOfClans => "Clash of Clans",
            Self::ClashRoyale => "Clash Royale",
        }
    }

    /// Path segments of the player resource, relative to the base URL.
    ///
    /// Segments are unencoded; the upstream client encodes each one when it
    /// builds the request URL.
    pub fn resource_segments(self, tag: &PlayerTag) -> [&str; 2] {
        ["players", tag.as_str()]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Caller-supplied player identifier, guaranteed non-empty.
///
/// The value is opaque; no structure beyond presence is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerTag(String);

impl PlayerTag {
    /// Accept a raw query value, rejecting absent or empty tags.
    pub fn parse(raw: Option<&str>) -> Result<Self, GatewayError> {
        match raw {
            Some(tag) if !tag.is_empty() => Ok(Self(tag.to_string())),
            _ => Err(GatewayError::MissingTag),
        }
    }

    /// The tag exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache key: the kind's namespace prefix followed by the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a tag under a kind.
    pub fn new(kind: ResourceKind, tag: &PlayerTag) -> Self {
        Self(format!("{}{}", kind.cache_prefix(), tag.as_str()))
    }

    /// Key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream base URL for every kind.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoints {
    clash_of_clans: Url,
    clash_royale: Url,
}

impl UpstreamEndpoints {
    /// Endpoints with explicit base URLs.
    pub const fn new(clash_of_clans: Url, clash_royale: Url) -> Self {
        Self {
            clash_of_clans,
            clash_royale,
        }
    }

    /// Base URL for a kind.
    pub const fn base_url(&self, kind: ResourceKind) -> &Url {
        match kind {
            ResourceKind::ClashOfClans => &self.clash_of_clans,
            ResourceKind::ClashRoyale => &self.clash_royale,
        }
    }
}
