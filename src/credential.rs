//! In-memory API credential handling.
//!
//! The key lives only as long as the session holds it: never written to
//! disk, zeroed on drop. It leaves the process solely as the authorization
//! header of the completion call, and `Debug` output redacts it.

use std::fmt;

use zeroize::Zeroize;

/// API key for the remote completion endpoint.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Wrap a key, trimming surrounding whitespace. Returns `None` for
    /// empty input: an absent credential is a normal state, not an error.
    pub fn new(key: &str) -> Option<Self> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key. Only the HTTP client should call this, to build the
    /// authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(<redacted>)")
    }
}
