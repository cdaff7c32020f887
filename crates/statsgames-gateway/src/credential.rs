//! Upstream credential supply.

use std::fmt;

/// Bearer token sent to the upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token value for the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Source of the upstream credential, read once per request.
///
/// `None` means no credential is configured, which is a deployment error
/// rather than an upstream failure.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Current credential, if any.
    fn credential(&self) -> Option<Credential>;
}

/// Credential fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    credential: Option<Credential>,
}

impl StaticCredential {
    /// Empty or whitespace-only values count as absent.
    pub fn new(token: Option<String>) -> Self {
        let credential = token
            .filter(|value| !value.trim().is_empty())
            .map(Credential::new);
        Self { credential }
    }

    /// Whether a credential is configured.
    pub const fn is_configured(&self) -> bool {
        self.credential.is_some()
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }
}
