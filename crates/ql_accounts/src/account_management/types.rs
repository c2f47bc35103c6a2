//! Core types for account management

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Debug, Display};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Access token stored for offline accounts.
///
/// It's a placeholder the game accepts when playing offline and
/// is never sent to an authentication server.
pub const OFFLINE_ACCESS_TOKEN: &str = "ACCESS_TOKEN_OFFLINE";

/// Represents different account providers supported by the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountProvider {
    /// Legacy Mojang (Yggdrasil) accounts, username + password
    Mojang,
    /// Microsoft accounts, signed in through the browser
    Microsoft,
    /// Local accounts with no authentication at all
    Offline,
}

impl Display for AccountProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccountProvider::Mojang => "Mojang",
                AccountProvider::Microsoft => "Microsoft",
                AccountProvider::Offline => "Offline",
            }
        )
    }
}

impl AccountProvider {
    /// Whether accounts of this provider ever talk to a server.
    #[must_use]
    pub fn uses_network(self) -> bool {
        !matches!(self, AccountProvider::Offline)
    }
}

/// A secret token (access, refresh or game token).
///
/// `Debug` only shows a short preview, and every token is
/// registered with the log redactor when it's created.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        if token != OFFLINE_ACCESS_TOKEN {
            ql_core::print::register_secret(&token);
        }
        Self(token)
    }

    #[must_use]
    pub fn offline() -> Self {
        Self(OFFLINE_ACCESS_TOKEN.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.0 == OFFLINE_ACCESS_TOKEN
    }

    /// First 8 characters followed by `...`
    #[must_use]
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(8).collect();
        format!("{head}...")
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("preview", &self.preview())
            .finish()
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(AccessToken::new)
    }
}

/// A password or other sensitive input, wiped from memory on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The outer Microsoft OAuth session of a Microsoft account.
///
/// It outlives the game token and is used to mint new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrosoftSession {
    pub access_token: AccessToken,
    pub refresh_token: AccessToken,
    /// Unix time in milliseconds
    pub expires_at: i64,
}

/// Provider-specific account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountKind {
    Mojang,
    Microsoft {
        /// Expiry of the game token (`Account::access_token`),
        /// Unix time in milliseconds
        expires_at: i64,
        microsoft: MicrosoftSession,
    },
    Offline,
}

impl AccountKind {
    #[must_use]
    pub fn provider(&self) -> AccountProvider {
        match self {
            AccountKind::Mojang => AccountProvider::Mojang,
            AccountKind::Microsoft { .. } => AccountProvider::Microsoft,
            AccountKind::Offline => AccountProvider::Offline,
        }
    }
}

/// Account information structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// UUID of the game profile, 32 hex characters without dashes.
    pub uuid: String,
    /// The identifier used to log in (username or email).
    pub username: String,
    /// In-game name.
    pub display_name: String,
    /// Token for launching the game.
    /// For offline accounts, this is [`OFFLINE_ACCESS_TOKEN`].
    pub access_token: AccessToken,
    pub kind: AccountKind,
}

impl Account {
    #[must_use]
    pub fn provider(&self) -> AccountProvider {
        self.kind.provider()
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        matches!(self.kind, AccountKind::Offline)
    }

    /// Get a modified username for display purposes
    #[must_use]
    pub fn display_username(&self) -> String {
        let suffix = match self.provider() {
            AccountProvider::Microsoft => "",
            AccountProvider::Mojang => " (mojang)",
            AccountProvider::Offline => " (offline)",
        };
        format!("{}{suffix}", self.display_name)
    }
}

// Data returned by the authentication servers

/// A game profile: the in-game identity of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProfile {
    pub id: String,
    pub name: String,
}

/// Result of a Mojang `authenticate` or `refresh` call.
#[derive(Debug, Clone)]
pub struct MojangSession {
    pub access_token: AccessToken,
    pub client_token: String,
    /// `None` if the account doesn't own the game.
    pub selected_profile: Option<GameProfile>,
}

/// Microsoft OAuth token response.
#[derive(Debug, Clone)]
pub struct MicrosoftToken {
    pub access_token: AccessToken,
    pub refresh_token: AccessToken,
    /// Seconds
    pub expires_in: i64,
}

/// Xbox Live user token.
#[derive(Debug, Clone)]
pub struct XblToken {
    pub token: AccessToken,
    pub uhs: String,
}

/// Xbox Live security token, exchanged for a game token.
#[derive(Debug, Clone)]
pub struct XstsToken {
    pub token: AccessToken,
    pub uhs: String,
}

/// Token for the game services.
#[derive(Debug, Clone)]
pub struct GameToken {
    pub access_token: AccessToken,
    /// Seconds
    pub expires_in: i64,
}
