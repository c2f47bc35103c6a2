//! Offline (username-only) identities.
//!
//! Offline accounts never talk to a server, so their UUID is
//! derived from the username alone: the same name always maps
//! to the same UUID, on every machine.

use regex::Regex;
use sha1::{Digest, Sha1};
use std::sync::LazyLock;

use crate::account_management::errors::AccountError;

/// Fixed namespace mixed into every offline UUID.
const OFFLINE_NAMESPACE: &str = "c637a90f-9694-4d87-9750-3211516e8b4e";

/// Name the shared client token is derived from, when it's first
/// needed by an offline login.
pub const CLIENT_TOKEN_SEED: &str = "ClientToken";

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,16}$").expect("valid username regex"));

/// Whether `username` is a valid in-game name:
/// 1 to 16 ASCII letters, digits or underscores.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// A username that passed [`is_valid_username`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfflineUsername(String);

impl OfflineUsername {
    /// # Errors
    /// [`AccountError::InvalidUsername`] if `username` isn't a valid in-game name.
    pub fn new(username: impl Into<String>) -> Result<Self, AccountError> {
        let username = username.into();
        if is_valid_username(&username) {
            Ok(Self(username))
        } else {
            Err(AccountError::InvalidUsername(username))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The UUID of this offline identity.
    #[must_use]
    pub fn uuid(&self) -> String {
        offline_uuid(&self.0)
    }
}

/// Derives a stable UUID (32 lowercase hex chars, no dashes) from a name.
///
/// SHA-1 of namespace + name, truncated to 32 hex digits, with the
/// version nibble (index 12) forced to `3` so it looks like any other
/// name-based UUID.
#[must_use]
pub fn offline_uuid(name: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(OFFLINE_NAMESPACE.as_bytes());
    hasher.update(name.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    let mut uuid = String::with_capacity(32);
    uuid.push_str(&hash[..12]);
    uuid.push('3');
    uuid.push_str(&hash[13..32]);
    uuid
}
